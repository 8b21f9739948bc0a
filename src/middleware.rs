//! HTTP 中间件
//! 请求追踪、错误诊断信息

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::{AppError, ErrorDiagnostics},
    services::{ArticleService, AuthService, ProfileService},
};

/// 应用状态
///
/// 服务通过 Arc 共享，请求之间无可变状态
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// 使用内存存储时为 None
    pub db: Option<sqlx::PgPool>,
    pub auth_service: Arc<AuthService>,
    pub article_service: Arc<ArticleService>,
    pub profile_service: Arc<ProfileService>,
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().clone();
    let uri = req.uri().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        // 标签使用静态字符串，避免基数膨胀
        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            "PATCH" => "PATCH",
            "OPTIONS" => "OPTIONS",
            _ => "UNKNOWN",
        };
        let status_code = match status {
            200 => "200",
            201 => "201",
            400 => "400",
            401 => "401",
            403 => "403",
            404 => "404",
            500 => "500",
            _ => "other",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_code)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            uri = %uri,
            status = status,
            elapsed_ms = elapsed.as_millis(),
            "Request completed"
        );

        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            headers.insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            headers.insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// 非生产模式下在错误响应中附加 `detail` 诊断字段
pub async fn error_detail_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;

    if state.config.server.is_production() {
        return response;
    }

    let Some(diagnostics) = response.extensions().get::<ErrorDiagnostics>().cloned() else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    let mut body = diagnostics.body;
    body.detail = Some(diagnostics.detail);

    // 重新生成 body，Content-Length 随之更新
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    let rebuilt = Json(body).into_response();
    let (rebuilt_parts, rebuilt_body) = rebuilt.into_parts();
    for (name, value) in rebuilt_parts.headers.iter() {
        parts.headers.insert(name.clone(), value.clone());
    }

    Response::from_parts(parts, rebuilt_body)
}

/// 处理器 panic 时返回 500 信封（配合 `CatchPanicLayer::custom`）
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let reason = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());

    AppError::Internal(format!("Handler panicked: {}", reason)).into_response()
}
