//! Fixed-window rate limiting with named policies.
//!
//! Each policy is a `{ window, max_requests }` pair; callers pick a policy
//! by name and supply a caller key (client IP or API key). State is an
//! in-memory map, so limits are per process instance.

use cinegrok_core::error::RateLimitErrorCode;
use cinegrok_core::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// One named rate limit policy.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub window: Duration,
    pub max_requests: u32,
}

impl RateLimitPolicy {
    pub const fn new(window_secs: u64, max_requests: u32) -> Self {
        Self {
            window: Duration::from_secs(window_secs),
            max_requests,
        }
    }
}

/// The outcome of a rate limit check.
#[derive(Debug, Clone, Copy)]
pub struct Decision {
    pub allowed: bool,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Seconds until the window resets, set when denied.
    pub retry_after: Option<u64>,
}

struct WindowRecord {
    window_start: Instant,
    count: u32,
    window: Duration,
}

/// Fixed-window rate limiter over named policies.
pub struct RateLimiter {
    policies: HashMap<String, RateLimitPolicy>,
    windows: Mutex<HashMap<String, WindowRecord>>,
}

impl RateLimiter {
    pub fn new(policies: HashMap<String, RateLimitPolicy>) -> Self {
        Self {
            policies,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// The service's standard policies.
    pub fn with_default_policies() -> Self {
        let mut policies = HashMap::new();
        policies.insert("general".to_string(), RateLimitPolicy::new(60, 120));
        policies.insert("track".to_string(), RateLimitPolicy::new(60, 300));
        policies.insert("signup".to_string(), RateLimitPolicy::new(3600, 10));
        policies.insert("bio".to_string(), RateLimitPolicy::new(60, 10));
        Self::new(policies)
    }

    /// Check one request against a named policy.
    ///
    /// Unknown policy names deny the request: a typo in a route must not
    /// silently disable its limit.
    pub fn check(&self, policy: &str, key: &str) -> Decision {
        let Some(cfg) = self.policies.get(policy) else {
            warn!(policy = policy, "Unknown rate limit policy, denying request");
            return Decision {
                allowed: false,
                remaining: 0,
                retry_after: None,
            };
        };

        let full_key = format!("{}:{}", policy, key);
        let now = Instant::now();
        let mut windows = self.windows.lock();

        let record = windows.entry(full_key).or_insert_with(|| WindowRecord {
            window_start: now,
            count: 0,
            window: cfg.window,
        });

        if now.duration_since(record.window_start) >= cfg.window {
            record.window_start = now;
            record.count = 0;
        }

        record.count += 1;

        if record.count <= cfg.max_requests {
            Decision {
                allowed: true,
                remaining: cfg.max_requests - record.count,
                retry_after: None,
            }
        } else {
            let elapsed = now.duration_since(record.window_start);
            let retry_after = cfg.window.saturating_sub(elapsed).as_secs().max(1);
            Decision {
                allowed: false,
                remaining: 0,
                retry_after: Some(retry_after),
            }
        }
    }

    /// Check and convert a denial into the coded rate limit error.
    pub fn enforce(&self, policy: &str, key: &str) -> Result<()> {
        let decision = self.check(policy, key);
        if decision.allowed {
            return Ok(());
        }
        cinegrok_telemetry::metrics().rate_limited_requests.inc();
        Err(Error::rate_limit(
            RateLimitErrorCode::Exceeded,
            "Rate limit exceeded",
            decision.retry_after,
        ))
    }

    /// Sweep windows whose period has fully elapsed.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock();
        windows.retain(|_, record| now.duration_since(record.window_start) < record.window);
    }
}

/// Shared rate limiter state.
pub type SharedRateLimiter = Arc<RateLimiter>;
