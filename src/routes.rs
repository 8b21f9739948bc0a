//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    handler::Handler,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

use crate::{auth::middleware::require_auth, handlers, middleware::AppState};

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 认证只包裹具体的处理器，方法不匹配时不会先要求令牌
    let auth = from_fn_with_state(state.clone(), require_auth);

    Router::new()
        // 公开端点（健康检查）
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // 认证
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me.layer(auth.clone())))
        // 文章
        .route(
            "/api/articles",
            get(handlers::article::list_articles)
                .post(handlers::article::create_article.layer(auth.clone())),
        )
        .route(
            "/api/articles/{id}",
            get(handlers::article::get_article)
                .put(handlers::article::update_article.layer(auth.clone()))
                .delete(handlers::article::delete_article.layer(auth)),
        )
        // 个人主页
        .route("/api/users/{username}", get(handlers::profile::get_profile))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(crate::middleware::panic_response))
        .layer(from_fn_with_state(
            state.clone(),
            crate::middleware::error_detail_middleware,
        ))
        .layer(cors_layer(&state.config.server.client_url))
        .layer(from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}

/// 仅允许配置的前端来源；地址非法时不放行任何跨域请求
fn cors_layer(client_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(client_url) {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            tracing::warn!(client_url = %client_url, "Invalid client_url, CORS disabled");
            cors
        }
    }
}
