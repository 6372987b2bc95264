//! Tracking, stats, and bio generation tests.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{
    fixtures,
    setup::{signup, TestContext},
};

const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile";
const DESKTOP_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0)";

async fn published_profile(server: &TestServer, api_key: &str, name: &str) -> String {
    let mut body = fixtures::full_submission(name);
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

async fn track_view(server: &TestServer, profile_id: &str, referer: &str, ua: &str) {
    let response = server
        .post("/v1/track")
        .add_header("Referer", referer)
        .add_header("User-Agent", ua)
        .json(&serde_json::json!({ "profileId": profile_id, "event": "view" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["accepted"], true);
}

#[tokio::test]
async fn test_views_and_clicks_roll_up_into_stats() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, api_key) = signup(&server, "maker@example.com").await;
    let id = published_profile(&server, &api_key, "Jane Roe").await;

    track_view(&server, &id, "https://l.instagram.com/?u=x", IPHONE_UA).await;
    track_view(&server, &id, "https://m.youtube.com/watch?v=1", DESKTOP_UA).await;
    track_view(&server, &id, "https://cinegrok.test/browse", DESKTOP_UA).await;

    let response = server
        .post("/v1/track")
        .json(&serde_json::json!({
            "profileId": id,
            "event": "click",
            "clickType": "showreel"
        }))
        .await;
    response.assert_status_ok();

    let response = server
        .get(&format!("/v1/profiles/{}/stats?days=7", id))
        .add_header("X-API-Key", &api_key)
        .await;
    response.assert_status_ok();
    let stats: serde_json::Value = response.json();

    assert_eq!(stats["views"], 3);
    assert_eq!(stats["clicks"], 1);
    assert_eq!(stats["ctr"], 33.3);
    // No traffic in the preceding window: any growth reads as 100%
    assert_eq!(stats["viewsTrend"], 100);
    assert_eq!(stats["referrers"]["instagram"], 1);
    assert_eq!(stats["referrers"]["youtube"], 1);
    assert_eq!(stats["referrers"]["direct"], 1);
    assert_eq!(stats["devices"]["mobile"], 1);
    assert_eq!(stats["devices"]["desktop"], 2);
    assert_eq!(stats["clickTypes"]["showreel"], 1);
    assert_eq!(stats["completeness"], 100);
    assert_eq!(stats["tips"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_trend_compares_against_preceding_window() {
    use chrono::{Days, Utc};
    use cinegrok_core::{DeviceCategory, ReferrerCategory};

    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, api_key) = signup(&server, "maker@example.com").await;
    let id = published_profile(&server, &api_key, "Jane Roe").await;
    let profile_id = uuid::Uuid::parse_str(&id).unwrap();

    let today = Utc::now().date_naive();
    let seed = |date| {
        ctx.store
            .record_view(profile_id, date, ReferrerCategory::Direct, DeviceCategory::Desktop)
            .unwrap()
    };

    // Current window (days=7): today back through today-6
    for _ in 0..3 {
        seed(today);
    }
    // Previous window: today-13 through today-7
    for _ in 0..6 {
        seed(today - Days::new(8));
    }
    seed(today - Days::new(13)); // oldest day still inside the previous window
    seed(today - Days::new(14)); // one day older, must not count

    let response = server
        .get(&format!("/v1/profiles/{}/stats?days=7", id))
        .add_header("X-API-Key", &api_key)
        .await;
    response.assert_status_ok();
    let stats: serde_json::Value = response.json();

    assert_eq!(stats["views"], 3);
    // 3 views against 7 before: round((3 - 7) / 7 * 100) = -57
    assert_eq!(stats["viewsTrend"], -57);
}

#[tokio::test]
async fn test_track_unknown_profile_is_dropped_not_errored() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/v1/track")
        .json(&serde_json::json!({
            "profileId": uuid::Uuid::new_v4(),
            "event": "view"
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["accepted"], false);
}

#[tokio::test]
async fn test_track_draft_profile_is_dropped() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, api_key) = signup(&server, "maker@example.com").await;

    let response = server
        .post("/v1/profiles")
        .add_header("X-API-Key", &api_key)
        .json(&fixtures::full_submission("Jane Roe"))
        .await;
    response.assert_status(StatusCode::CREATED);
    let id = response.json::<serde_json::Value>()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .post("/v1/track")
        .json(&serde_json::json!({ "profileId": id, "event": "view" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["accepted"], false);
}

#[tokio::test]
async fn test_click_requires_click_type() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, api_key) = signup(&server, "maker@example.com").await;
    let id = published_profile(&server, &api_key, "Jane Roe").await;

    let response = server
        .post("/v1/track")
        .json(&serde_json::json!({ "profileId": id, "event": "click" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001");
}

#[tokio::test]
async fn test_stats_are_owner_only() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, owner_key) = signup(&server, "owner@example.com").await;
    let (_, other_key) = signup(&server, "other@example.com").await;
    let id = published_profile(&server, &owner_key, "Jane Roe").await;

    let response = server
        .get(&format!("/v1/profiles/{}/stats", id))
        .add_header("X-API-Key", &other_key)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "AUTH_005");
}

#[tokio::test]
async fn test_sparse_profile_gets_tips() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, api_key) = signup(&server, "maker@example.com").await;

    let mut body = fixtures::submission("Sparse Maker");
    body["published"] = serde_json::json!(true);
    let response = server
        .post("/v1/profiles")
        .add_header("X-API-Key", &api_key)
        .json(&body)
        .await;
    let id = response.json::<serde_json::Value>()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .get(&format!("/v1/profiles/{}/stats", id))
        .add_header("X-API-Key", &api_key)
        .await;
    response.assert_status_ok();
    let stats: serde_json::Value = response.json();

    let completeness = stats["completeness"].as_u64().unwrap();
    assert!(completeness > 0 && completeness < 100);
    assert_eq!(stats["tips"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_bio_generation_is_deterministic() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, api_key) = signup(&server, "maker@example.com").await;
    let id = published_profile(&server, &api_key, "Jane Roe").await;

    let response = server
        .post(&format!("/v1/profiles/{}/bio", id))
        .add_header("X-API-Key", &api_key)
        .await;
    response.assert_status_ok();
    let first: serde_json::Value = response.json();
    let bio = first["bio"].as_str().unwrap();

    assert!(bio.starts_with("Jane Roe is a Director and Writer"));
    assert!(bio.contains("\"Night Currents\" (2020), and \"The Long Field\" (2023)"));

    // Same fields, same bio
    let response = server
        .post(&format!("/v1/profiles/{}/bio", id))
        .add_header("X-API-Key", &api_key)
        .await;
    let second: serde_json::Value = response.json();
    assert_eq!(first["bio"], second["bio"]);

    // The stored profile carries the generated bio publicly
    let response = server.get("/v1/filmmakers/jane-roe").await;
    let public: serde_json::Value = response.json();
    assert_eq!(public["bio"].as_str().unwrap(), bio);
}

#[tokio::test]
async fn test_bio_requires_owner() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, owner_key) = signup(&server, "owner@example.com").await;
    let (_, other_key) = signup(&server, "other@example.com").await;
    let id = published_profile(&server, &owner_key, "Jane Roe").await;

    let response = server
        .post(&format!("/v1/profiles/{}/bio", id))
        .add_header("X-API-Key", &other_key)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}
