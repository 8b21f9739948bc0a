//! Public profiles

use std::sync::Arc;

use crate::{
    error::AppError,
    models::user::{ProfileResponse, UserResponse},
    repository::UserRepository,
    services::ArticleService,
};

pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    article_service: Arc<ArticleService>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, article_service: Arc<ArticleService>) -> Self {
        Self {
            users,
            article_service,
        }
    }

    /// User plus their articles, newest first
    pub async fn get_profile(&self, username: &str) -> Result<ProfileResponse, AppError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let articles = self.article_service.list_by_author(&user).await?;

        Ok(ProfileResponse {
            user: UserResponse::from(user),
            articles,
        })
    }
}
