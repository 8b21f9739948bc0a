//! HTTP 处理器模块

pub mod article;
pub mod auth;
pub mod health;
pub mod profile;

use crate::error::AppError;
use axum::http::Uri;

/// 未匹配路由
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {} not found", uri.path()))
}
