//! Auth error codes, rate limiting, and the billing surface.

use axum::http::StatusCode;
use cinegrok_api::middleware::rate_limit::{RateLimitPolicy, RateLimiter};
use cinegrok_api::SiteConfig;
use integration_tests::{
    fixtures,
    setup::{signup, TestContext},
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn test_missing_api_key_returns_auth_001() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/v1/billing/subscription").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "AUTH_001");
}

#[tokio::test]
async fn test_invalid_key_format_returns_auth_002() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/v1/billing/subscription")
        .add_header("X-API-Key", "invalid_key_format")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "AUTH_002");
}

#[tokio::test]
async fn test_unknown_key_returns_auth_003() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/v1/billing/subscription")
        .add_header("X-API-Key", &fixtures::unknown_api_key())
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "AUTH_003");
}

#[tokio::test]
async fn test_revoked_key_returns_auth_004() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (account_id, api_key) = signup(&server, "maker@example.com").await;

    let account_id = Uuid::parse_str(&account_id).unwrap();
    ctx.store.revoke_account(account_id).unwrap();
    ctx.state.invalidate_auth(&api_key).await;

    let response = server
        .get("/v1/billing/subscription")
        .add_header("X-API-Key", &api_key)
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "AUTH_004");
}

#[tokio::test]
async fn test_bearer_header_also_accepted() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, api_key) = signup(&server, "maker@example.com").await;

    let response = server
        .get("/v1/billing/subscription")
        .add_header("Authorization", &format!("Bearer {}", api_key))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_beta_bypass_entitles_free_accounts() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, api_key) = signup(&server, "maker@example.com").await;

    let response = server
        .get("/v1/billing/subscription")
        .add_header("X-API-Key", &api_key)
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["tier"], "free");
    assert_eq!(body["status"], "none");
    assert_eq!(body["entitled"], true);
    assert_eq!(body["betaBypass"], true);
}

#[tokio::test]
async fn test_without_bypass_free_accounts_are_not_entitled() {
    let ctx = TestContext::with_site(SiteConfig {
        own_domain: "cinegrok.test".to_string(),
        beta_bypass: false,
    });
    let server = ctx.server();
    let (_, api_key) = signup(&server, "maker@example.com").await;

    let response = server
        .get("/v1/billing/subscription")
        .add_header("X-API-Key", &api_key)
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["entitled"], false);
    assert_eq!(body["betaBypass"], false);
}

#[tokio::test]
async fn test_signup_rate_limit_returns_429_with_retry_after() {
    let mut policies = HashMap::new();
    policies.insert("signup".to_string(), RateLimitPolicy::new(3600, 2));
    // Other routes keep their standard limits
    policies.insert("general".to_string(), RateLimitPolicy::new(60, 120));
    policies.insert("track".to_string(), RateLimitPolicy::new(60, 300));
    policies.insert("bio".to_string(), RateLimitPolicy::new(60, 10));

    let ctx = TestContext::with_rate_limiter(Arc::new(RateLimiter::new(policies)));
    let server = ctx.server();

    signup(&server, "one@example.com").await;
    signup(&server, "two@example.com").await;

    let response = server
        .post("/v1/accounts")
        .json(&serde_json::json!({ "email": "three@example.com" }))
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let retry_after = response
        .headers()
        .get("Retry-After")
        .expect("Retry-After header")
        .to_str()
        .unwrap()
        .parse::<u64>()
        .unwrap();
    assert!(retry_after > 0 && retry_after <= 3600);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "RATE_001");
}

#[tokio::test]
async fn test_duplicate_signup_rejected() {
    let ctx = TestContext::new();
    let server = ctx.server();

    signup(&server, "maker@example.com").await;
    let response = server
        .post("/v1/accounts")
        .json(&serde_json::json!({ "email": "MAKER@example.com" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_issued_keys_carry_requested_env() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let (_, test_key) = signup(&server, "maker@example.com").await;
    assert!(test_key.starts_with("cgk_test_"));

    let response = server
        .post("/v1/accounts")
        .json(&serde_json::json!({ "email": "live@example.com", "env": "live" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert!(body["apiKey"].as_str().unwrap().starts_with("cgk_live_"));
}
