//! Profile CRUD, publishing, and bulk import tests.

use axum::http::StatusCode;
use axum_test::TestServer;
use cinegrok_api::SiteConfig;
use integration_tests::{
    fixtures,
    setup::{signup, TestContext},
};

async fn authed_server(ctx: &TestContext, email: &str) -> (TestServer, String) {
    let server = ctx.server();
    let (_, api_key) = signup(&server, email).await;
    (server, api_key)
}

#[tokio::test]
async fn test_create_fetch_publish_flow() {
    let ctx = TestContext::new();
    let (server, api_key) = authed_server(&ctx, "maker@example.com").await;

    // Create unpublished
    let response = server
        .post("/v1/profiles")
        .add_header("X-API-Key", &api_key)
        .json(&fixtures::submission("Jane Roe"))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    assert_eq!(created["slug"], "jane-roe");
    assert_eq!(created["published"], false);
    let id = created["id"].as_str().unwrap().to_string();

    // Owner can fetch by ID
    let response = server
        .get(&format!("/v1/profiles/{}", id))
        .add_header("X-API-Key", &api_key)
        .await;
    response.assert_status_ok();

    // Not public while unpublished
    let response = server.get("/v1/filmmakers/jane-roe").await;
    response.assert_status(StatusCode::NOT_FOUND);

    // Publish via update
    let mut update = fixtures::submission("Jane Roe");
    update["published"] = serde_json::json!(true);
    let response = server
        .put(&format!("/v1/profiles/{}", id))
        .add_header("X-API-Key", &api_key)
        .json(&update)
        .await;
    response.assert_status_ok();

    // Public by slug now, without exposing the owner
    let response = server.get("/v1/filmmakers/jane-roe").await;
    response.assert_status_ok();
    let public: serde_json::Value = response.json();
    assert_eq!(public["displayName"], "Jane Roe");
    assert!(public.get("ownerId").is_none());
}

#[tokio::test]
async fn test_create_requires_auth() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/v1/profiles")
        .json(&fixtures::submission("Jane Roe"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "AUTH_001");
}

#[tokio::test]
async fn test_missing_display_name_rejected() {
    let ctx = TestContext::new();
    let (server, api_key) = authed_server(&ctx, "maker@example.com").await;

    let response = server
        .post("/v1/profiles")
        .add_header("X-API-Key", &api_key)
        .json(&serde_json::json!({ "roles": ["Director"] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_account_cannot_modify() {
    let ctx = TestContext::new();
    let (server, owner_key) = authed_server(&ctx, "owner@example.com").await;
    let (_, intruder_key) = signup(&server, "intruder@example.com").await;

    let response = server
        .post("/v1/profiles")
        .add_header("X-API-Key", &owner_key)
        .json(&fixtures::submission("Jane Roe"))
        .await;
    let id = response.json::<serde_json::Value>()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .delete(&format!("/v1/profiles/{}", id))
        .add_header("X-API-Key", &intruder_key)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "AUTH_005");
}

#[tokio::test]
async fn test_delete_profile() {
    let ctx = TestContext::new();
    let (server, api_key) = authed_server(&ctx, "maker@example.com").await;

    let response = server
        .post("/v1/profiles")
        .add_header("X-API-Key", &api_key)
        .json(&fixtures::submission("Jane Roe"))
        .await;
    let id = response.json::<serde_json::Value>()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .delete(&format!("/v1/profiles/{}", id))
        .add_header("X-API-Key", &api_key)
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = server
        .get(&format!("/v1/profiles/{}", id))
        .add_header("X-API-Key", &api_key)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_list_only_published() {
    let ctx = TestContext::new();
    let (server, api_key) = authed_server(&ctx, "maker@example.com").await;

    for (name, publish) in [("Published Maker", true), ("Draft Maker", false)] {
        let mut body = fixtures::submission(name);
        body["published"] = serde_json::json!(publish);
        server
            .post("/v1/profiles")
            .add_header("X-API-Key", &api_key)
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server.get("/v1/profiles").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["profiles"][0]["displayName"], "Published Maker");
}

#[tokio::test]
async fn test_import_accepts_all_three_shapes() {
    let ctx = TestContext::new();
    let (server, api_key) = authed_server(&ctx, "maker@example.com").await;

    let cases = [
        fixtures::array_payload(vec![
            fixtures::submission("Array One"),
            fixtures::submission("Array Two"),
        ]),
        fixtures::wrapper_payload(vec![fixtures::submission("Wrapped One")]),
        fixtures::single_payload(fixtures::submission("Single One")),
    ];
    let expected = [2, 1, 1];

    for (payload, want) in cases.into_iter().zip(expected) {
        let response = server
            .post("/v1/profiles/import")
            .content_type("application/json")
            .add_header("X-API-Key", &api_key)
            .bytes(payload.into())
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["accepted"], want);
        assert_eq!(body["rejected"], 0);
    }
}

#[tokio::test]
async fn test_import_partial_success() {
    let ctx = TestContext::new();
    let (server, api_key) = authed_server(&ctx, "maker@example.com").await;

    let payload = fixtures::array_payload(vec![
        fixtures::submission("Valid Maker"),
        serde_json::json!({ "roles": ["Director"] }), // no displayName
    ]);

    let response = server
        .post("/v1/profiles/import")
        .content_type("application/json")
        .add_header("X-API-Key", &api_key)
        .bytes(payload.into())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["accepted"], 1);
    assert_eq!(body["rejected"], 1);
    assert!(body["errors"][0].as_str().unwrap().contains("profile[1]"));
}

#[tokio::test]
async fn test_import_invalid_json_is_valid_001() {
    let ctx = TestContext::new();
    let (server, api_key) = authed_server(&ctx, "maker@example.com").await;

    let response = server
        .post("/v1/profiles/import")
        .content_type("application/json")
        .add_header("X-API-Key", &api_key)
        .bytes("not json at all".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001");
}

#[tokio::test]
async fn test_free_tier_profile_limit_without_bypass() {
    let ctx = TestContext::with_site(SiteConfig {
        own_domain: "cinegrok.test".to_string(),
        beta_bypass: false,
    });
    let (server, api_key) = authed_server(&ctx, "maker@example.com").await;

    server
        .post("/v1/profiles")
        .add_header("X-API-Key", &api_key)
        .json(&fixtures::submission("First Profile"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/v1/profiles")
        .add_header("X-API-Key", &api_key)
        .json(&fixtures::submission("Second Profile"))
        .await;
    response.assert_status(StatusCode::PAYMENT_REQUIRED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PAY_001");
}
