//! 应用组装
//! 根据配置选择存储，创建服务并构建 AppState

use std::sync::Arc;

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    config::AppConfig,
    db,
    error::AppError,
    middleware::AppState,
    repository::Repositories,
    services::{ArticleService, AuthService, ProfileService},
};

/// 按配置连接存储（PostgreSQL 会执行迁移）并组装状态
pub async fn build_state(config: AppConfig) -> anyhow::Result<Arc<AppState>> {
    let (repos, pool) = if config.database.is_memory() {
        tracing::warn!("Using in-memory store, data is lost on exit");
        (Repositories::memory(), None)
    } else {
        let pool = db::create_pool(&config.database).await?;
        db::run_migrations(&pool).await?;
        tracing::info!("Database initialized");
        (Repositories::postgres(pool.clone()), Some(pool))
    };

    let hasher = PasswordHasher::from_config(&config.security)?;

    Ok(build_state_with(config, repos, pool, hasher)?)
}

/// 使用给定的存储和哈希器组装状态
pub fn build_state_with(
    config: AppConfig,
    repos: Repositories,
    db: Option<sqlx::PgPool>,
    hasher: PasswordHasher,
) -> Result<Arc<AppState>, AppError> {
    let jwt_service = Arc::new(JwtService::from_config(&config)?);

    let auth_service = Arc::new(AuthService::new(
        repos.users.clone(),
        Arc::new(hasher),
        jwt_service,
    ));
    let article_service = Arc::new(ArticleService::new(
        repos.articles.clone(),
        repos.users.clone(),
        config.pagination.clone(),
    ));
    let profile_service = Arc::new(ProfileService::new(
        repos.users.clone(),
        article_service.clone(),
    ));

    Ok(Arc::new(AppState {
        config,
        db,
        auth_service,
        article_service,
        profile_service,
    }))
}
