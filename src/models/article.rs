//! Article domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{check_length, user::AuthorSummary};

/// Article as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload; the id is assigned by the service so slug retries reuse it
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub author_id: Uuid,
}

/// Column changes for an update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    check_length(
        title.trim(),
        3,
        200,
        "Title must be at least 3 characters",
        "Title must be less than 200 characters",
    )
}

fn validate_content(content: &str) -> Result<(), ValidationError> {
    check_length(
        content,
        10,
        usize::MAX,
        "Content must be at least 10 characters",
        "Content is too long",
    )
}

fn validate_has_changes(req: &UpdateArticleRequest) -> Result<(), ValidationError> {
    let blank = |v: &Option<String>| v.as_deref().map_or(true, str::is_empty);
    if blank(&req.title) && blank(&req.content) {
        return Err(ValidationError::new("missing_fields").with_message(
            "At least one field (title or content) must be provided".into(),
        ));
    }
    Ok(())
}

/// Create article request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateArticleRequest {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[validate(custom(function = "validate_content"))]
    pub content: String,
}

/// Update article request (partial)
#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_has_changes"))]
pub struct UpdateArticleRequest {
    #[validate(custom(function = "validate_title"))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_content"))]
    pub content: Option<String>,
}

/// Feed query string. Values are kept raw so garbage falls back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListArticlesQuery {
    pub limit: Option<String>,
    pub skip: Option<String>,
}

/// Article response with its author embedded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub author: AuthorSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ArticleResponse {
    pub fn new(article: Article, author: AuthorSummary) -> Self {
        Self {
            id: article.id,
            title: article.title,
            slug: article.slug,
            content: article.content,
            author,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// Paginated feed
#[derive(Debug, Serialize)]
pub struct ArticleListResponse {
    pub articles: Vec<ArticleResponse>,
    pub total: i64,
    pub limit: i64,
    pub skip: i64,
}

#[derive(Debug, Serialize)]
pub struct ArticleEnvelope {
    pub article: ArticleResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
