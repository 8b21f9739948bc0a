//! 用户公开主页

use crate::{
    error::AppError, extract::ApiPath, middleware::AppState, models::response::ApiResponse,
};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    ApiPath(username): ApiPath<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.profile_service.get_profile(&username).await?;

    Ok(Json(ApiResponse::ok(profile)))
}
