//! 测试公共模块
//! 基于内存存储构建应用，并提供请求辅助函数
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use blog_service::{
    app,
    auth::password::PasswordHasher,
    config::{
        AppConfig, DatabaseConfig, LoggingConfig, PaginationConfig, SecurityConfig, ServerConfig,
    },
    middleware::AppState,
    repository::Repositories,
    routes,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "secret123";

/// 创建测试配置
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(), // 使用随机端口
            graceful_shutdown_timeout_secs: 5,
            environment: "test".to_string(),
            client_url: "http://localhost:5173".to_string(),
        },
        database: DatabaseConfig {
            url: Secret::new("memory://".to_string()),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new("test-secret-key-for-testing-only-min-32-chars".to_string()),
            token_exp_secs: 3600,
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
        },
        pagination: PaginationConfig {
            default_limit: 20,
            max_limit: 100,
        },
    }
}

/// 低成本哈希参数，加快测试
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1).expect("valid argon2 params")
}

/// 创建测试应用状态（内存存储）
pub fn create_test_app_state_with(config: AppConfig) -> Arc<AppState> {
    app::build_state_with(config, Repositories::memory(), None, test_hasher())
        .expect("Failed to build test state")
}

pub fn create_test_app_state() -> Arc<AppState> {
    create_test_app_state_with(create_test_config())
}

pub fn create_test_app() -> Router {
    routes::create_router(create_test_app_state())
}

/// 发送请求并解析 JSON 响应
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// 注册用户，返回 (token, user_id)
pub async fn signup(app: &Router, username: &str) -> (String, String) {
    let (status, json) = send(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": TEST_PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", json);

    (
        json["data"]["token"].as_str().unwrap().to_string(),
        json["data"]["user"]["id"].as_str().unwrap().to_string(),
    )
}

/// 创建文章，返回文章 JSON
pub async fn create_article(app: &Router, token: &str, title: &str, content: &str) -> Value {
    let (status, json) = send(
        app,
        Method::POST,
        "/api/articles",
        Some(token),
        Some(json!({ "title": title, "content": content })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);

    json["data"]["article"].clone()
}
