//! Application state shared across handlers.

use crate::middleware::rate_limit::{RateLimiter, SharedRateLimiter};
use cinegrok_core::{Account, ParsedApiKey, Result, SubscriptionTier};
use cinegrok_store::Store;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cache TTL for auth lookups (30 seconds).
///
/// Bounds revocation lag: a revoked key keeps working for at most this long.
const AUTH_CACHE_TTL: Duration = Duration::from_secs(30);

/// Maximum cache entries.
const AUTH_CACHE_MAX_CAPACITY: u64 = 10_000;

/// Site-level settings the handlers need.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Own domain, used to classify same-site referrers as direct.
    pub own_domain: String,
    /// While true, entitlement checks treat every active account as paid.
    pub beta_bypass: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            own_domain: "cinegrok.com".to_string(),
            beta_bypass: true,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Embedded store
    pub store: Arc<Store>,
    /// Rate limiter
    pub rate_limiter: SharedRateLimiter,
    /// Auth lookup cache (API key -> account)
    auth_cache: Cache<String, Account>,
    /// Site settings
    pub site: SiteConfig,
}

impl AppState {
    pub fn new(store: Arc<Store>, site: SiteConfig) -> Self {
        Self::with_rate_limiter(store, site, Arc::new(RateLimiter::with_default_policies()))
    }

    /// Create with a custom rate limiter (used by tests to tighten limits).
    pub fn with_rate_limiter(
        store: Arc<Store>,
        site: SiteConfig,
        rate_limiter: SharedRateLimiter,
    ) -> Self {
        Self {
            store,
            rate_limiter,
            auth_cache: Cache::builder()
                .max_capacity(AUTH_CACHE_MAX_CAPACITY)
                .time_to_live(AUTH_CACHE_TTL)
                .build(),
            site,
        }
    }

    /// Resolve an API key to its account, via the cache.
    pub async fn authenticate(&self, api_key: &ParsedApiKey) -> Result<Account> {
        let cache_key = api_key.as_str().to_string();

        if let Some(cached) = self.auth_cache.get(&cache_key).await {
            debug!("Auth cache hit");
            return Ok(cached);
        }

        let account = self.store.account_by_key(api_key.as_str())?;
        self.auth_cache.insert(cache_key, account.clone()).await;

        Ok(account)
    }

    /// Tier whose limits apply to an account right now.
    ///
    /// The beta bypass grants everyone the top tier's limits; afterwards an
    /// account gets its paid tier only while the subscription is active.
    pub fn effective_tier(&self, account: &Account) -> SubscriptionTier {
        if self.site.beta_bypass {
            return SubscriptionTier::Pro;
        }
        if account.is_entitled(false) {
            account.tier
        } else {
            SubscriptionTier::Free
        }
    }

    /// Invalidate a cached auth lookup, e.g. after revocation.
    pub async fn invalidate_auth(&self, api_key: &str) {
        self.auth_cache.invalidate(&api_key.to_string()).await;
    }

    /// Start the rate limiter cleanup background task.
    /// Returns a handle that can be used to cancel the task.
    pub fn start_rate_limiter_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let rate_limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300)); // 5 minutes
            loop {
                interval.tick().await;
                rate_limiter.cleanup();
            }
        })
    }
}
