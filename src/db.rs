//! PostgreSQL 存储：连接、迁移与表结构检查

use crate::{config::DatabaseConfig, error::AppError};
use secrecy::ExposeSecret;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// 博客数据所需的表，迁移后必须全部存在
pub const REQUIRED_TABLES: &[&str] = &["users", "articles"];

/// 按配置建立连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(config.url.expose_secret())
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "Connected to PostgreSQL"
    );

    Ok(pool)
}

/// 执行 `migrations/` 下的迁移，失败作为数据库错误返回
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Database(sqlx::Error::Migrate(Box::new(e))))?;

    tracing::info!(tables = ?REQUIRED_TABLES, "Schema up to date");
    Ok(())
}

/// 就绪检查：连接可用且博客表都已创建
///
/// 返回的错误信息直接展示在 `/ready` 的检查项里。
pub async fn check_schema(pool: &PgPool) -> Result<(), String> {
    metrics::gauge!("blog_db_connections", "state" => "open").set(pool.size() as f64);
    metrics::gauge!("blog_db_connections", "state" => "idle").set(pool.num_idle() as f64);

    let found: Vec<String> = sqlx::query_scalar(
        "SELECT table_name::TEXT FROM information_schema.tables \
         WHERE table_schema = current_schema() AND table_name::TEXT = ANY($1)",
    )
    .bind(REQUIRED_TABLES)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::warn!(error = %e, "Store readiness query failed");
        e.to_string()
    })?;

    let missing = missing_tables(&found);
    if missing.is_empty() {
        Ok(())
    } else {
        tracing::warn!(missing = ?missing, "Blog tables missing");
        Err(format!("missing tables: {}", missing.join(", ")))
    }
}

fn missing_tables(found: &[String]) -> Vec<&'static str> {
    REQUIRED_TABLES
        .iter()
        .copied()
        .filter(|table| !found.iter().any(|f| f == table))
        .collect()
}
