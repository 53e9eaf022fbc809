//! The cache interface used by frontends to keep encoded identicons.
//!
//! Keys are opaque string tags (the service uses the ETag). The interface
//! says nothing about capacity or eviction; implementations choose their own
//! strategy and can be swapped without touching callers.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

/// Concurrent key to bytes store.
///
/// Implementations must be safe for concurrent use from many request
/// handlers and keep at most one entry per key.
#[async_trait]
pub trait ByteCache: Send + Sync {
    /// Fetch the bytes stored under `key`.
    async fn get(&self, key: &str) -> Option<Bytes>;

    /// Store `data` under `key`, replacing any existing entry.
    async fn put(&self, key: &str, data: Bytes);

    /// Drop the entry for `key`, if any.
    async fn remove(&self, key: &str);

    /// Drop every entry.
    async fn clear(&self);

    /// Point-in-time counters. Caches that keep none report zeros.
    fn stats(&self) -> CacheSnapshot {
        CacheSnapshot::default()
    }
}

/// Point-in-time copy of a cache's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expired: u64,
    pub size_bytes: u64,
    pub entry_count: u64,
    pub eviction_runs: u64,
}

impl CacheSnapshot {
    /// Cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// A cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl ByteCache for NoopCache {
    async fn get(&self, _key: &str) -> Option<Bytes> {
        None
    }

    async fn put(&self, _key: &str, _data: Bytes) {}

    async fn remove(&self, _key: &str) {}

    async fn clear(&self) {}
}
