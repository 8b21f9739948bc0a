//! Article repository (数据库访问层)

use super::{map_unique_violation, ArticleRepository};
use crate::{
    error::AppError,
    models::article::{Article, ArticleChanges, NewArticle},
};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct PgArticleRepository {
    db: PgPool,
}

impl PgArticleRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    /// 创建文章
    async fn create(&self, article: NewArticle) -> Result<Article, AppError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (id, title, slug, content, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.content)
        .bind(article.author_id)
        .fetch_one(&self.db)
        .await
        .map_err(map_unique_violation)?;

        Ok(article)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, AppError> {
        let article = sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(article)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, AppError> {
        let article = sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.db)
            .await?;

        Ok(article)
    }

    /// 按创建时间倒序分页
    async fn list(&self, limit: i64, skip: i64) -> Result<Vec<Article>, AppError> {
        let articles = sqlx::query_as::<_, Article>(
            "SELECT * FROM articles ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.db)
        .await?;

        Ok(articles)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.db)
            .await?
            .get(0);

        Ok(count)
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Article>, AppError> {
        let articles = sqlx::query_as::<_, Article>(
            "SELECT * FROM articles WHERE author_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(author_id)
        .fetch_all(&self.db)
        .await?;

        Ok(articles)
    }

    /// 更新文章
    async fn update(
        &self,
        id: Uuid,
        changes: ArticleChanges,
    ) -> Result<Option<Article>, AppError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                content = COALESCE($4, content),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.slug)
        .bind(&changes.content)
        .fetch_optional(&self.db)
        .await
        .map_err(map_unique_violation)?;

        Ok(article)
    }

    /// 删除文章
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
