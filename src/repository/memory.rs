//! In-process store used with `memory://` and by the test suite.
//! Enforces the same uniqueness rules as the PostgreSQL schema.

use super::{ArticleRepository, UserRepository};
use crate::{
    error::{AppError, ConflictField},
    models::{
        article::{Article, ArticleChanges, NewArticle},
        user::{NewUser, User},
    },
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    // insertion order
    articles: Vec<Article>,
}

/// Shared tables behind one lock so cross-entity reads stay consistent
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

fn newest_first(mut articles: Vec<Article>) -> Vec<Article> {
    // later insertions win ties on created_at
    articles.reverse();
    articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    articles
}

pub struct MemoryUserRepository {
    store: MemoryStore,
}

impl MemoryUserRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.store.tables.write().await;

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(ConflictField::Email));
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(AppError::Conflict(ConflictField::Username));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            bio: user.bio,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }
}

pub struct MemoryArticleRepository {
    store: MemoryStore,
}

impl MemoryArticleRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ArticleRepository for MemoryArticleRepository {
    async fn create(&self, article: NewArticle) -> Result<Article, AppError> {
        let mut tables = self.store.tables.write().await;

        if tables.articles.iter().any(|a| a.slug == article.slug) {
            return Err(AppError::Conflict(ConflictField::Slug));
        }

        let now = Utc::now();
        let article = Article {
            id: article.id,
            title: article.title,
            slug: article.slug,
            content: article.content,
            author_id: article.author_id,
            created_at: now,
            updated_at: now,
        };
        tables.articles.push(article.clone());

        Ok(article)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.articles.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.articles.iter().find(|a| a.slug == slug).cloned())
    }

    async fn list(&self, limit: i64, skip: i64) -> Result<Vec<Article>, AppError> {
        let tables = self.store.tables.read().await;
        let skip = usize::try_from(skip).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);

        Ok(newest_first(tables.articles.clone())
            .into_iter()
            .skip(skip)
            .take(limit)
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.articles.len() as i64)
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Article>, AppError> {
        let tables = self.store.tables.read().await;
        let mine = tables
            .articles
            .iter()
            .filter(|a| a.author_id == author_id)
            .cloned()
            .collect();

        Ok(newest_first(mine))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ArticleChanges,
    ) -> Result<Option<Article>, AppError> {
        let mut tables = self.store.tables.write().await;

        if let Some(slug) = &changes.slug {
            if tables.articles.iter().any(|a| a.id != id && &a.slug == slug) {
                return Err(AppError::Conflict(ConflictField::Slug));
            }
        }

        let Some(article) = tables.articles.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            article.title = title;
        }
        if let Some(slug) = changes.slug {
            article.slug = slug;
        }
        if let Some(content) = changes.content {
            article.content = content;
        }
        article.updated_at = Utc::now();

        Ok(Some(article.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.store.tables.write().await;
        let before = tables.articles.len();
        tables.articles.retain(|a| a.id != id);
        Ok(tables.articles.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            bio: String::new(),
        }
    }

    fn new_article(author_id: Uuid, slug: &str) -> NewArticle {
        NewArticle {
            id: Uuid::new_v4(),
            title: "Some title".to_string(),
            slug: slug.to_string(),
            content: "0123456789".to_string(),
            author_id,
        }
    }

    #[tokio::test]
    async fn test_user_uniqueness() {
        let repo = MemoryUserRepository::new(MemoryStore::default());
        repo.create(new_user("bob", "bob@x.com")).await.unwrap();

        let err = repo.create(new_user("bobby", "bob@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ConflictField::Email)));

        let err = repo.create(new_user("bob", "other@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ConflictField::Username)));
    }

    #[tokio::test]
    async fn test_slug_uniqueness_on_create_and_update() {
        let store = MemoryStore::default();
        let repo = MemoryArticleRepository::new(store);
        let author = Uuid::new_v4();

        repo.create(new_article(author, "a-111111")).await.unwrap();
        let second = repo.create(new_article(author, "b-222222")).await.unwrap();

        let err = repo.create(new_article(author, "a-111111")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ConflictField::Slug)));

        let changes = ArticleChanges {
            slug: Some("a-111111".to_string()),
            ..Default::default()
        };
        let err = repo.update(second.id, changes).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ConflictField::Slug)));
    }

    #[tokio::test]
    async fn test_list_newest_first_with_pagination() {
        let repo = MemoryArticleRepository::new(MemoryStore::default());
        let author = Uuid::new_v4();

        let first = repo.create(new_article(author, "one-aaaaaa")).await.unwrap();
        let second = repo.create(new_article(author, "two-bbbbbb")).await.unwrap();
        let third = repo.create(new_article(author, "three-cccccc")).await.unwrap();

        let page = repo.list(2, 0).await.unwrap();
        assert_eq!(
            page.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![third.id, second.id]
        );

        let page = repo.list(2, 2).await.unwrap();
        assert_eq!(page.iter().map(|a| a.id).collect::<Vec<_>>(), vec![first.id]);

        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = MemoryArticleRepository::new(MemoryStore::default());
        let article = repo
            .create(new_article(Uuid::new_v4(), "gone-zzzzzz"))
            .await
            .unwrap();

        assert!(repo.delete(article.id).await.unwrap());
        assert!(!repo.delete(article.id).await.unwrap());
        assert!(repo.find_by_id(article.id).await.unwrap().is_none());
    }
}
