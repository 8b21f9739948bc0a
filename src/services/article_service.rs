//! Article service: feed, lookup and owner-only mutations

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    auth::ownership::{assert_owner, OwnedAction},
    config::PaginationConfig,
    error::{AppError, ConflictField},
    models::{
        article::{
            Article, ArticleChanges, ArticleListResponse, ArticleResponse, CreateArticleRequest,
            ListArticlesQuery, NewArticle, UpdateArticleRequest,
        },
        user::{AuthorSummary, User},
    },
    repository::{ArticleRepository, UserRepository},
    slug,
};

/// Attempts at finding a free slug before giving up
pub const MAX_SLUG_ATTEMPTS: usize = 5;

/// Resolved `limit`/`skip` for the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub skip: i64,
}

impl Page {
    /// Missing, unparseable or non-positive limits fall back to the default
    pub fn from_query(query: &ListArticlesQuery, config: &PaginationConfig) -> Self {
        let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<i64>().ok());

        let limit = match parse(&query.limit) {
            Some(n) if n > 0 => n.min(config.max_limit),
            _ => config.default_limit,
        };
        let skip = parse(&query.skip).unwrap_or(0).max(0);

        Self { limit, skip }
    }
}

pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
    users: Arc<dyn UserRepository>,
    pagination: PaginationConfig,
}

impl ArticleService {
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        users: Arc<dyn UserRepository>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            articles,
            users,
            pagination,
        }
    }

    pub async fn create(
        &self,
        author: &User,
        req: CreateArticleRequest,
    ) -> Result<ArticleResponse, AppError> {
        let title = req.title.trim().to_string();
        let id = Uuid::new_v4();

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = NewArticle {
                id,
                title: title.clone(),
                slug: slug::generate(&title),
                content: req.content.clone(),
                author_id: author.id,
            };

            match self.articles.create(candidate).await {
                Ok(article) => {
                    tracing::info!(
                        article_id = %article.id,
                        author_id = %author.id,
                        slug = %article.slug,
                        "Article created"
                    );
                    return Ok(ArticleResponse::new(article, AuthorSummary::from(author)));
                }
                Err(AppError::Conflict(ConflictField::Slug)) => {
                    tracing::debug!(attempt, "Slug collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(slug_exhausted())
    }

    pub async fn list(&self, query: &ListArticlesQuery) -> Result<ArticleListResponse, AppError> {
        let page = Page::from_query(query, &self.pagination);

        let articles = self.articles.list(page.limit, page.skip).await?;
        let total = self.articles.count().await?;

        Ok(ArticleListResponse {
            articles: self.with_authors(articles).await?,
            total,
            limit: page.limit,
            skip: page.skip,
        })
    }

    /// Resolve by id first, then by slug
    pub async fn get(&self, id_or_slug: &str) -> Result<ArticleResponse, AppError> {
        let article = self.resolve(id_or_slug).await?;
        let author = self.author_of(&article).await?;

        Ok(ArticleResponse::new(article, author))
    }

    pub async fn update(
        &self,
        id_or_slug: &str,
        actor: &User,
        req: UpdateArticleRequest,
    ) -> Result<ArticleResponse, AppError> {
        let existing = self.resolve(id_or_slug).await?;
        assert_owner(existing.author_id, actor.id, OwnedAction::Update)?;

        let title = req
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let content = req.content.filter(|c| !c.is_empty());

        let retitled = title.as_deref().filter(|t| *t != existing.title);

        // Only a changed title needs a fresh slug
        let attempts = if retitled.is_some() { MAX_SLUG_ATTEMPTS } else { 1 };

        for attempt in 1..=attempts {
            let changes = ArticleChanges {
                title: title.clone(),
                slug: retitled.map(slug::generate),
                content: content.clone(),
            };

            match self.articles.update(existing.id, changes).await {
                Ok(Some(article)) => {
                    tracing::info!(
                        article_id = %article.id,
                        slug = %article.slug,
                        "Article updated"
                    );
                    return Ok(ArticleResponse::new(article, AuthorSummary::from(actor)));
                }
                Ok(None) => return Err(AppError::not_found("Article not found")),
                Err(AppError::Conflict(ConflictField::Slug)) if retitled.is_some() => {
                    tracing::debug!(attempt, "Slug collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(slug_exhausted())
    }

    pub async fn delete(&self, id_or_slug: &str, actor: &User) -> Result<(), AppError> {
        let existing = self.resolve(id_or_slug).await?;
        assert_owner(existing.author_id, actor.id, OwnedAction::Delete)?;

        if !self.articles.delete(existing.id).await? {
            return Err(AppError::not_found("Article not found"));
        }

        tracing::info!(article_id = %existing.id, author_id = %actor.id, "Article deleted");
        Ok(())
    }

    /// Newest first
    pub async fn list_by_author(&self, author: &User) -> Result<Vec<ArticleResponse>, AppError> {
        let summary = AuthorSummary::from(author);
        let articles = self.articles.list_by_author(author.id).await?;

        Ok(articles
            .into_iter()
            .map(|a| ArticleResponse::new(a, summary.clone()))
            .collect())
    }

    async fn resolve(&self, id_or_slug: &str) -> Result<Article, AppError> {
        if let Ok(id) = Uuid::parse_str(id_or_slug) {
            if let Some(article) = self.articles.find_by_id(id).await? {
                return Ok(article);
            }
        }

        self.articles
            .find_by_slug(id_or_slug)
            .await?
            .ok_or_else(|| AppError::not_found("Article not found"))
    }

    async fn author_of(&self, article: &Article) -> Result<AuthorSummary, AppError> {
        self.users
            .find_by_id(article.author_id)
            .await?
            .map(|u| AuthorSummary::from(&u))
            .ok_or_else(|| AppError::Internal(format!("Author {} missing", article.author_id)))
    }

    /// One author lookup per page
    async fn with_authors(&self, articles: Vec<Article>) -> Result<Vec<ArticleResponse>, AppError> {
        let mut ids: Vec<Uuid> = articles.iter().map(|a| a.author_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let authors: HashMap<Uuid, AuthorSummary> = self
            .users
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(|u| (u.id, AuthorSummary::from(u)))
            .collect();

        articles
            .into_iter()
            .map(|a| {
                let author = authors
                    .get(&a.author_id)
                    .cloned()
                    .ok_or_else(|| AppError::Internal(format!("Author {} missing", a.author_id)))?;
                Ok(ArticleResponse::new(a, author))
            })
            .collect()
    }
}

fn slug_exhausted() -> AppError {
    tracing::error!(attempts = MAX_SLUG_ATTEMPTS, "Could not find a free slug");
    AppError::internal("Could not generate a unique slug")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, skip: Option<&str>) -> ListArticlesQuery {
        ListArticlesQuery {
            limit: limit.map(str::to_string),
            skip: skip.map(str::to_string),
        }
    }

    fn pagination() -> PaginationConfig {
        PaginationConfig {
            default_limit: 20,
            max_limit: 100,
        }
    }

    #[test]
    fn test_page_defaults() {
        let page = Page::from_query(&query(None, None), &pagination());
        assert_eq!(page, Page { limit: 20, skip: 0 });
    }

    #[test]
    fn test_page_clamping() {
        let cfg = pagination();
        assert_eq!(Page::from_query(&query(Some("500"), None), &cfg).limit, 100);
        assert_eq!(Page::from_query(&query(Some("0"), None), &cfg).limit, 20);
        assert_eq!(Page::from_query(&query(Some("-3"), None), &cfg).limit, 20);
        assert_eq!(Page::from_query(&query(None, Some("-7")), &cfg).skip, 0);
        assert_eq!(
            Page::from_query(&query(Some("5"), Some("10")), &cfg),
            Page { limit: 5, skip: 10 }
        );
    }

    #[test]
    fn test_page_garbage_falls_back() {
        let page = Page::from_query(&query(Some("abc"), Some("x1")), &pagination());
        assert_eq!(page, Page { limit: 20, skip: 0 });
    }
}
