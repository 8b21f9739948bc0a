//! 文章 API 集成测试

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::{create_article, create_test_app, send, signup};

#[tokio::test]
async fn test_end_to_end_create_get_and_foreign_delete() {
    let app = create_test_app();
    let (bob_token, bob_id) = signup(&app, "bob").await;

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/articles",
        Some(&bob_token),
        Some(json!({ "title": "Hi there", "content": "0123456789" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Article created successfully");

    let article = &json["data"]["article"];
    let slug = article["slug"].as_str().unwrap();
    assert!(slug.starts_with("hi-there-"));
    assert_eq!(slug.len(), "hi-there-".len() + 6);
    assert_eq!(article["author"]["id"], bob_id.as_str());
    assert_eq!(article["author"]["username"], "bob");

    let id = article["id"].as_str().unwrap();
    let uri = format!("/api/articles/{}", id);
    let (status, json) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["article"]["title"], "Hi there");
    assert_eq!(json["data"]["article"]["content"], "0123456789");

    let (eve_token, _) = signup(&app, "eve").await;
    let (status, json) = send(
        &app,
        Method::DELETE,
        &format!("/api/articles/{}", id),
        Some(&eve_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "You can only delete your own articles");
}

#[tokio::test]
async fn test_get_by_id_and_by_slug_match() {
    let app = create_test_app();
    let (token, _) = signup(&app, "bob").await;
    let article = create_article(
        &app,
        &token,
        "Rust ownership, explained!",
        "Borrowing rules in practice.",
    )
    .await;

    let id = article["id"].as_str().unwrap();
    let slug = article["slug"].as_str().unwrap();
    assert!(slug.starts_with("rust-ownership-explained-"));

    let by_id_uri = format!("/api/articles/{}", id);
    let by_slug_uri = format!("/api/articles/{}", slug);
    let (_, by_id) = send(&app, Method::GET, &by_id_uri, None, None).await;
    let (_, by_slug) = send(&app, Method::GET, &by_slug_uri, None, None).await;

    assert_eq!(by_id["data"]["article"]["id"], by_slug["data"]["article"]["id"]);
    assert_eq!(by_id["data"]["article"]["slug"], slug);
}

#[tokio::test]
async fn test_get_unknown_article() {
    let app = create_test_app();

    let (status, json) = send(&app, Method::GET, "/api/articles/no-such-slug", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Article not found");

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/articles/{}", uuid::Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_requires_auth() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/articles",
        None,
        Some(json!({ "title": "Hi there", "content": "0123456789" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "No token provided");
}

#[tokio::test]
async fn test_create_validation() {
    let app = create_test_app();
    let (token, _) = signup(&app, "bob").await;

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/articles",
        Some(&token),
        Some(json!({ "title": "Hi", "content": "short" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = json["errors"].as_array().unwrap();
    assert!(errors
        .iter()
        .any(|e| e["field"] == "title" && e["message"] == "Title must be at least 3 characters"));
    assert!(errors.iter().any(|e| {
        e["field"] == "content" && e["message"] == "Content must be at least 10 characters"
    }));
}

#[tokio::test]
async fn test_update_by_owner_regenerates_slug() {
    let app = create_test_app();
    let (token, _) = signup(&app, "bob").await;
    let article = create_article(&app, &token, "First draft", "Some body text here.").await;
    let id = article["id"].as_str().unwrap();

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/articles/{}", id),
        Some(&token),
        Some(json!({ "title": "Final version" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Article updated successfully");
    let updated = &json["data"]["article"];
    assert_eq!(updated["title"], "Final version");
    assert_eq!(updated["content"], "Some body text here.");
    assert!(updated["slug"].as_str().unwrap().starts_with("final-version-"));
    assert_eq!(updated["id"], article["id"]);
}

#[tokio::test]
async fn test_update_content_keeps_slug() {
    let app = create_test_app();
    let (token, _) = signup(&app, "bob").await;
    let article = create_article(&app, &token, "Stable title", "Original content.").await;
    let id = article["id"].as_str().unwrap();

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/articles/{}", id),
        Some(&token),
        Some(json!({ "title": "Stable title", "content": "Rewritten content." })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["article"]["slug"], article["slug"]);
    assert_eq!(json["data"]["article"]["content"], "Rewritten content.");
}

#[tokio::test]
async fn test_update_requires_a_field() {
    let app = create_test_app();
    let (token, _) = signup(&app, "bob").await;
    let article = create_article(&app, &token, "Some title", "Some content.").await;
    let id = article["id"].as_str().unwrap();

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/articles/{}", id),
        Some(&token),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["field"], "body");
    assert_eq!(
        json["errors"][0]["message"],
        "At least one field (title or content) must be provided"
    );
}

#[tokio::test]
async fn test_non_owner_cannot_update_or_delete() {
    let app = create_test_app();
    let (alice, _) = signup(&app, "alice").await;
    let (mallory, _) = signup(&app, "mallory").await;
    let article = create_article(&app, &alice, "Alice writes", "Alice's own content.").await;
    let uri = format!("/api/articles/{}", article["id"].as_str().unwrap());

    let (status, json) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&mallory),
        Some(json!({ "content": "Hijacked content!" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "You can only update your own articles");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&mallory), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 所有者仍可操作
    let (status, json) = send(&app, Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["message"], "Article deleted successfully");

    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_article() {
    let app = create_test_app();
    let (token, _) = signup(&app, "bob").await;

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/articles/{}", uuid::Uuid::new_v4()),
        Some(&token),
        Some(json!({ "content": "Does not matter." })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Article not found");
}

#[tokio::test]
async fn test_list_pagination() {
    let app = create_test_app();
    let (token, _) = signup(&app, "bob").await;
    for i in 0..3 {
        create_article(&app, &token, &format!("Article number {}", i), "Plenty of content.").await;
    }

    let (status, json) = send(&app, Method::GET, "/api/articles?limit=2&skip=0", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["limit"], 2);
    assert_eq!(json["data"]["skip"], 0);
    assert_eq!(json["data"]["articles"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["articles"][0]["author"]["username"], "bob");

    let (_, json) = send(&app, Method::GET, "/api/articles?limit=2&skip=2", None, None).await;
    assert_eq!(json["data"]["articles"].as_array().unwrap().len(), 1);

    let uri = "/api/articles?limit=abc&skip=-4";
    let (status, json) = send(&app, Method::GET, uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["limit"], 20);
    assert_eq!(json["data"]["skip"], 0);

    let (_, json) = send(&app, Method::GET, "/api/articles?limit=1000", None, None).await;
    assert_eq!(json["data"]["limit"], 100);
}

#[tokio::test]
async fn test_list_newest_first() {
    let app = create_test_app();
    let (token, _) = signup(&app, "bob").await;
    create_article(&app, &token, "Older post", "Written first of all.").await;
    let newer = create_article(&app, &token, "Newer post", "Written second of all.").await;

    let (_, json) = send(&app, Method::GET, "/api/articles", None, None).await;
    assert_eq!(json["data"]["articles"][0]["id"], newer["id"]);
}
