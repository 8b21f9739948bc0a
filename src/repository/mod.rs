//! Database repository layer
//! One data-access trait per entity type, with a PostgreSQL and an in-memory backend.

pub mod article_repo;
pub mod memory;
pub mod user_repo;

pub use article_repo::PgArticleRepository;
pub use memory::{MemoryArticleRepository, MemoryStore, MemoryUserRepository};
pub use user_repo::PgUserRepository;

use crate::{
    error::{AppError, ConflictField},
    models::{
        article::{Article, ArticleChanges, NewArticle},
        user::{NewUser, User},
    },
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the username or email is taken
    async fn create(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Fails with `Conflict(Slug)` when the slug is taken
    async fn create(&self, article: NewArticle) -> Result<Article, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, AppError>;

    /// Newest first
    async fn list(&self, limit: i64, skip: i64) -> Result<Vec<Article>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// Newest first
    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Article>, AppError>;

    /// Applies the changes and bumps `updated_at`; `None` if the article is gone
    async fn update(&self, id: Uuid, changes: ArticleChanges)
        -> Result<Option<Article>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// The repositories a process runs against
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub articles: Arc<dyn ArticleRepository>,
}

impl Repositories {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            articles: Arc::new(PgArticleRepository::new(pool)),
        }
    }

    pub fn memory() -> Self {
        let store = MemoryStore::default();
        Self {
            users: Arc::new(MemoryUserRepository::new(store.clone())),
            articles: Arc::new(MemoryArticleRepository::new(store)),
        }
    }
}

/// 唯一约束冲突映射为业务错误，其他数据库错误原样返回
pub(crate) fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("users_email_key") => return AppError::Conflict(ConflictField::Email),
                Some("users_username_key") => return AppError::Conflict(ConflictField::Username),
                Some("articles_slug_key") => return AppError::Conflict(ConflictField::Slug),
                _ => {}
            }
        }
    }
    AppError::Database(err)
}
