//! Article HTTP handlers

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    extract::{ApiPath, ApiQuery, ValidatedJson},
    middleware::AppState,
    models::{
        article::{
            ArticleEnvelope, CreateArticleRequest, ListArticlesQuery, MessageResponse,
            UpdateArticleRequest,
        },
        response::ApiResponse,
    },
};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

pub async fn create_article(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateArticleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let article = state.article_service.create(&user, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Article created successfully",
            ArticleEnvelope { article },
        )),
    ))
}

/// Public feed; bad query values fall back to defaults
pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListArticlesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.article_service.list(&query).await?;

    Ok(Json(ApiResponse::ok(page)))
}

/// Lookup by id or slug
pub async fn get_article(
    State(state): State<Arc<AppState>>,
    ApiPath(id_or_slug): ApiPath<String>,
) -> Result<impl IntoResponse, AppError> {
    let article = state.article_service.get(&id_or_slug).await?;

    Ok(Json(ApiResponse::ok(ArticleEnvelope { article })))
}

pub async fn update_article(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<UpdateArticleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let article = state.article_service.update(&id, &user, req).await?;

    Ok(Json(ApiResponse::with_message(
        "Article updated successfully",
        ArticleEnvelope { article },
    )))
}

pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse, AppError> {
    state.article_service.delete(&id, &user).await?;

    let message = "Article deleted successfully";
    Ok(Json(ApiResponse::with_message(
        message,
        MessageResponse {
            message: message.to_string(),
        },
    )))
}
