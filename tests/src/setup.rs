//! Common test setup functions.

use axum::Router;
use axum_test::TestServer;
use cinegrok_api::middleware::rate_limit::SharedRateLimiter;
use cinegrok_api::{router, AppState, SiteConfig};
use cinegrok_store::{Store, StoreConfig};
use std::sync::Arc;

/// Test context running the real router against a temp-file store.
///
/// Production code paths throughout: the real Axum router with all
/// middleware, the real embedded store, only the database file is
/// temporary.
pub struct TestContext {
    _dir: tempfile::TempDir,
    pub store: Arc<Store>,
    pub state: AppState,
    pub router: Router,
}

impl TestContext {
    /// Default context: beta bypass on, standard rate limit policies.
    pub fn new() -> Self {
        Self::with_site(SiteConfig {
            own_domain: "cinegrok.test".to_string(),
            beta_bypass: true,
        })
    }

    /// Context with custom site settings.
    pub fn with_site(site: SiteConfig) -> Self {
        Self::build(site, None)
    }

    /// Context with a custom rate limiter (for limit behavior tests).
    pub fn with_rate_limiter(rate_limiter: SharedRateLimiter) -> Self {
        Self::build(
            SiteConfig {
                own_domain: "cinegrok.test".to_string(),
                beta_bypass: true,
            },
            Some(rate_limiter),
        )
    }

    fn build(site: SiteConfig, rate_limiter: Option<SharedRateLimiter>) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = StoreConfig {
            path: dir
                .path()
                .join("cinegrok-test.redb")
                .to_string_lossy()
                .into_owned(),
        };
        let store = Arc::new(Store::open(&config).expect("Failed to open test store"));
        cinegrok_telemetry::health().store.set_healthy();

        let state = match rate_limiter {
            Some(limiter) => AppState::with_rate_limiter(store.clone(), site, limiter),
            None => AppState::new(store.clone(), site),
        };
        let router = router(state.clone());

        Self {
            _dir: dir,
            store,
            state,
            router,
        }
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router.clone()).expect("Failed to create test server")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Sign up an account and return (account_id, api_key).
pub async fn signup(server: &TestServer, email: &str) -> (String, String) {
    let response = server
        .post("/v1/accounts")
        .json(&serde_json::json!({ "email": email, "env": "test" }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    (
        body["accountId"].as_str().expect("accountId").to_string(),
        body["apiKey"].as_str().expect("apiKey").to_string(),
    )
}
