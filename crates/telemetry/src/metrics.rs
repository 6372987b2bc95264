//! Internal metrics collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, 10s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        // Value exceeds all buckets, add to last
        self.buckets[10].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the directory service.
#[derive(Debug, Default)]
pub struct Metrics {
    // Profile metrics
    pub profiles_created: Counter,
    pub profiles_updated: Counter,
    pub profiles_deleted: Counter,
    pub profiles_imported: Counter,
    pub import_rejections: Counter,
    pub bios_generated: Counter,

    // Analytics metrics
    pub views_tracked: Counter,
    pub clicks_tracked: Counter,
    pub track_failures: Counter,
    pub stats_requests: Counter,

    // Access metrics
    pub accounts_created: Counter,
    pub auth_failures: Counter,
    pub rate_limited_requests: Counter,

    // Latency histograms
    pub track_latency_ms: Histogram,
    pub stats_latency_ms: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub profiles_created: u64,
    pub profiles_updated: u64,
    pub profiles_deleted: u64,
    pub profiles_imported: u64,
    pub import_rejections: u64,
    pub bios_generated: u64,
    pub views_tracked: u64,
    pub clicks_tracked: u64,
    pub track_failures: u64,
    pub stats_requests: u64,
    pub accounts_created: u64,
    pub auth_failures: u64,
    pub rate_limited_requests: u64,
    pub track_latency_mean_ms: f64,
    pub stats_latency_mean_ms: f64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            profiles_created: self.profiles_created.get(),
            profiles_updated: self.profiles_updated.get(),
            profiles_deleted: self.profiles_deleted.get(),
            profiles_imported: self.profiles_imported.get(),
            import_rejections: self.import_rejections.get(),
            bios_generated: self.bios_generated.get(),
            views_tracked: self.views_tracked.get(),
            clicks_tracked: self.clicks_tracked.get(),
            track_failures: self.track_failures.get(),
            stats_requests: self.stats_requests.get(),
            accounts_created: self.accounts_created.get(),
            auth_failures: self.auth_failures.get(),
            rate_limited_requests: self.rate_limited_requests.get(),
            track_latency_mean_ms: self.track_latency_ms.mean(),
            stats_latency_mean_ms: self.stats_latency_ms.mean(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
