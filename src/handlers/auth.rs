//! 认证相关的 HTTP 处理器

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    extract::ValidatedJson,
    middleware::AppState,
    models::{
        auth::{CurrentUserResponse, LoginRequest, SignupRequest},
        response::ApiResponse,
        user::UserResponse,
    },
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// 注册
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.signup(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("User registered successfully", response)),
    ))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.login(req).await?;

    Ok(Json(ApiResponse::with_message("Login successful", response)))
}

/// 获取当前用户信息
pub async fn me(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(ApiResponse::ok(CurrentUserResponse {
        user: UserResponse::from(user),
    }))
}
