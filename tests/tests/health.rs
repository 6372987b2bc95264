//! Health and metrics endpoints require no auth.

use integration_tests::setup::TestContext;

#[tokio::test]
async fn test_health_reports_store() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store_connected"], true);
}

#[tokio::test]
async fn test_readiness_and_liveness() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server.get("/health/ready").await.assert_status_ok();
    server.get("/health/live").await.assert_status_ok();
}

#[tokio::test]
async fn test_metrics_snapshot() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/metrics").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body.get("views_tracked").is_some());
    assert!(body.get("track_latency_mean_ms").is_some());
}
