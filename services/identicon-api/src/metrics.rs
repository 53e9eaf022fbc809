//! Application metrics collection and reporting.

use metrics::{counter, gauge, histogram};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use storage::CacheSnapshot;
use tokio::sync::RwLock;

/// Metrics collector for the identicon API.
///
/// Counters are mirrored into the `metrics` registry for Prometheus and kept
/// locally so the JSON endpoints work without a recorder installed.
#[derive(Debug)]
pub struct MetricsCollector {
    pub requests: AtomicU64,
    pub not_modified: AtomicU64,
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub renders_total: AtomicU64,
    pub render_errors: AtomicU64,

    /// Render + encode timing, stored as microseconds
    render_times: RwLock<TimingStats>,

    start_time: Instant,
}

#[derive(Debug, Default)]
struct TimingStats {
    count: u64,
    total_us: u64,
    min_us: u64,
    max_us: u64,
    last_us: u64,
}

impl TimingStats {
    fn record(&mut self, duration_us: u64) {
        self.count += 1;
        self.total_us += duration_us;
        self.last_us = duration_us;
        if self.min_us == 0 || duration_us < self.min_us {
            self.min_us = duration_us;
        }
        if duration_us > self.max_us {
            self.max_us = duration_us;
        }
    }

    fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.total_us as f64 / self.count as f64) / 1000.0
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            not_modified: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            renders_total: AtomicU64::new(0),
            render_errors: AtomicU64::new(0),
            render_times: RwLock::new(TimingStats::default()),
            start_time: Instant::now(),
        }
    }

    /// Record an identicon request
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        counter!("identicon_requests_total").increment(1);
    }

    /// Record a request answered with 304
    pub fn record_not_modified(&self) {
        self.not_modified.fetch_add(1, Ordering::Relaxed);
        counter!("identicon_not_modified_total").increment(1);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        counter!("identicon_cache_hits_total").increment(1);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        counter!("identicon_cache_misses_total").increment(1);
    }

    /// Record a render + encode pass
    pub async fn record_render(&self, duration_us: u64, success: bool) {
        self.renders_total.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.render_errors.fetch_add(1, Ordering::Relaxed);
            counter!("identicon_render_errors_total").increment(1);
        }
        self.render_times.write().await.record(duration_us);
        histogram!("identicon_render_duration_ms").record(duration_us as f64 / 1000.0);
    }

    /// Publish byte cache statistics as gauges
    pub fn record_cache_stats(&self, stats: &CacheSnapshot) {
        gauge!("identicon_cache_size_bytes").set(stats.size_bytes as f64);
        gauge!("identicon_cache_entries").set(stats.entry_count as f64);
        gauge!("identicon_cache_evictions_total").set(stats.evictions as f64);
        gauge!("identicon_cache_expired_total").set(stats.expired as f64);
        gauge!("identicon_cache_hit_rate_percent").set(stats.hit_rate());
    }

    /// Get current metrics snapshot
    pub async fn snapshot(&self) -> MetricsSnapshot {
        let render_times = self.render_times.read().await;

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            requests: self.requests.load(Ordering::Relaxed),
            not_modified: self.not_modified.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            renders_total: self.renders_total.load(Ordering::Relaxed),
            render_errors: self.render_errors.load(Ordering::Relaxed),
            render_avg_ms: render_times.avg_ms(),
            render_last_ms: render_times.last_us as f64 / 1000.0,
            render_min_ms: render_times.min_us as f64 / 1000.0,
            render_max_ms: render_times.max_us as f64 / 1000.0,
        }
    }
}

/// Point-in-time view of the collector, served as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub requests: u64,
    pub not_modified: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub renders_total: u64,
    pub render_errors: u64,
    pub render_avg_ms: f64,
    pub render_last_ms: f64,
    pub render_min_ms: f64,
    pub render_max_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counters_and_timing() {
        let metrics = MetricsCollector::new();
        metrics.record_request();
        metrics.record_request();
        metrics.record_not_modified();
        metrics.record_cache_miss();
        metrics.record_render(2_000, true).await;
        metrics.record_render(4_000, false).await;

        let snapshot = metrics.snapshot().await;
        assert_eq!(snapshot.requests, 2);
        assert_eq!(snapshot.not_modified, 1);
        assert_eq!(snapshot.cache_misses, 1);
        assert_eq!(snapshot.renders_total, 2);
        assert_eq!(snapshot.render_errors, 1);
        assert!((snapshot.render_avg_ms - 3.0).abs() < 1e-9);
        assert!((snapshot.render_min_ms - 2.0).abs() < 1e-9);
        assert!((snapshot.render_max_ms - 4.0).abs() < 1e-9);
        assert!((snapshot.render_last_ms - 4.0).abs() < 1e-9);
    }
}
