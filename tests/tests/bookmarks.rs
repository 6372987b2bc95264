//! Bookmark tests.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{
    fixtures,
    setup::{signup, TestContext},
};

async fn published_profile(server: &TestServer, api_key: &str, name: &str) -> String {
    let mut body = fixtures::submission(name);
    body["published"] = serde_json::json!(true);
    let response = server
        .post("/v1/profiles")
        .add_header("X-API-Key", api_key)
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<serde_json::Value>()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_add_list_remove() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, maker_key) = signup(&server, "maker@example.com").await;
    let (_, scout_key) = signup(&server, "scout@example.com").await;
    let id = published_profile(&server, &maker_key, "Jane Roe").await;

    let response = server
        .post(&format!("/v1/bookmarks/{}", id))
        .add_header("X-API-Key", &scout_key)
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = server
        .get("/v1/bookmarks")
        .add_header("X-API-Key", &scout_key)
        .await;
    response.assert_status_ok();
    let listed: serde_json::Value = response.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["filmmakerId"], id.as_str());

    let response = server
        .delete(&format!("/v1/bookmarks/{}", id))
        .add_header("X-API-Key", &scout_key)
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = server
        .delete(&format!("/v1/bookmarks/{}", id))
        .add_header("X-API-Key", &scout_key)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_is_idempotent() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, maker_key) = signup(&server, "maker@example.com").await;
    let (_, scout_key) = signup(&server, "scout@example.com").await;
    let id = published_profile(&server, &maker_key, "Jane Roe").await;

    for _ in 0..2 {
        server
            .post(&format!("/v1/bookmarks/{}", id))
            .add_header("X-API-Key", &scout_key)
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server
        .get("/v1/bookmarks")
        .add_header("X-API-Key", &scout_key)
        .await;
    let listed: serde_json::Value = response.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cannot_bookmark_unknown_or_draft_profile() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, maker_key) = signup(&server, "maker@example.com").await;
    let (_, scout_key) = signup(&server, "scout@example.com").await;

    // Unknown profile
    let response = server
        .post(&format!("/v1/bookmarks/{}", uuid::Uuid::new_v4()))
        .add_header("X-API-Key", &scout_key)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    // Draft profile
    let response = server
        .post("/v1/profiles")
        .add_header("X-API-Key", &maker_key)
        .json(&fixtures::submission("Draft Maker"))
        .await;
    let draft_id = response.json::<serde_json::Value>()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .post(&format!("/v1/bookmarks/{}", draft_id))
        .add_header("X-API-Key", &scout_key)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}
