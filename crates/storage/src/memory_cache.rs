//! In-memory LRU cache for encoded identicons.
//!
//! ## Memory-Based Eviction
//!
//! The cache uses memory-based eviction rather than entry count. When an
//! insert would push the cache over its configured memory limit, it evicts
//! least recently used entries in a batch of at least ~5% of the limit so
//! bursts of new identicons don't trigger an eviction per request.
//!
//! ## Metrics
//!
//! The cache tracks counters that the service exposes as JSON and
//! Prometheus gauges:
//! - `size_bytes`: Current memory usage
//! - `entry_count`: Number of cached images
//! - `hits`/`misses`: Cache hit rate
//! - `evictions`: Total entries evicted
//! - `eviction_runs`: Number of batch eviction events
//! - `expired`: Entries dropped on read because their TTL passed

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::byte_cache::{ByteCache, CacheSnapshot};

struct CachedImage {
    data: Bytes,
    inserted_at: Instant,
}

/// Statistics for the memory cache.
///
/// All fields are atomic for lock-free reads from metrics endpoints.
#[derive(Debug, Default)]
pub struct MemoryCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub evictions: AtomicU64,
    pub expired: AtomicU64,
    pub size_bytes: AtomicU64,
    pub entry_count: AtomicU64,
    pub eviction_runs: AtomicU64,
}

impl MemoryCacheStats {
    fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            size_bytes: self.size_bytes.load(Ordering::Relaxed),
            entry_count: self.entry_count.load(Ordering::Relaxed),
            eviction_runs: self.eviction_runs.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        for counter in [
            &self.hits,
            &self.misses,
            &self.evictions,
            &self.expired,
            &self.size_bytes,
            &self.entry_count,
            &self.eviction_runs,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Bounded, TTL-aware LRU implementation of [`ByteCache`].
///
/// - RwLock around the LRU; every access takes the write lock since a hit
///   reorders the LRU list
/// - Memory-based eviction when size exceeds the limit
/// - TTL enforcement on read (lazy expiration)
pub struct MemoryByteCache {
    cache: RwLock<LruCache<String, CachedImage>>,
    max_bytes: u64,
    ttl: Duration,
    stats: MemoryCacheStats,
}

impl MemoryByteCache {
    /// Create a cache holding at most `max_size_mb` megabytes.
    ///
    /// # Example
    /// ```
    /// use storage::MemoryByteCache;
    ///
    /// // 16MB of identicons, kept for a day
    /// let cache = MemoryByteCache::new(16, 86_400);
    /// assert_eq!(cache.max_bytes(), 16 * 1024 * 1024);
    /// ```
    pub fn new(max_size_mb: usize, ttl_secs: u64) -> Self {
        Self::with_max_bytes((max_size_mb as u64) * 1024 * 1024, Duration::from_secs(ttl_secs))
    }

    /// Create a cache with an exact byte limit.
    pub fn with_max_bytes(max_bytes: u64, ttl: Duration) -> Self {
        Self {
            cache: RwLock::new(LruCache::unbounded()),
            max_bytes,
            ttl,
            stats: MemoryCacheStats::default(),
        }
    }

    /// Evict LRU entries until `incoming` more bytes fit.
    ///
    /// Frees at least 5% of the limit per run. Returns (entries_evicted, bytes_freed).
    fn evict_locked(&self, cache: &mut LruCache<String, CachedImage>, incoming: u64) -> (u64, u64) {
        let current_bytes = self.stats.size_bytes.load(Ordering::Relaxed);
        let needed = (current_bytes + incoming).saturating_sub(self.max_bytes);
        let target_free = needed.max(self.max_bytes / 20);

        let mut bytes_freed = 0u64;
        let mut entries_evicted = 0u64;
        while bytes_freed < target_free {
            match cache.pop_lru() {
                Some((_, evicted)) => {
                    bytes_freed += evicted.data.len() as u64;
                    entries_evicted += 1;
                }
                None => break,
            }
        }

        self.stats.size_bytes.fetch_sub(bytes_freed, Ordering::Relaxed);
        self.stats.entry_count.fetch_sub(entries_evicted, Ordering::Relaxed);
        self.stats.evictions.fetch_add(entries_evicted, Ordering::Relaxed);
        self.stats.eviction_runs.fetch_add(1, Ordering::Relaxed);

        info!(
            entries_evicted,
            bytes_freed,
            cache_size_bytes = current_bytes - bytes_freed,
            max_bytes = self.max_bytes,
            "Identicon cache batch eviction completed"
        );

        (entries_evicted, bytes_freed)
    }

    /// Current number of entries in cache.
    pub fn len(&self) -> usize {
        self.stats.entry_count.load(Ordering::Relaxed) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn size_bytes(&self) -> u64 {
        self.stats.size_bytes.load(Ordering::Relaxed)
    }

    /// Current cache utilization ratio (0.0 - 1.0).
    pub fn utilization(&self) -> f64 {
        if self.max_bytes == 0 {
            0.0
        } else {
            self.size_bytes() as f64 / self.max_bytes as f64
        }
    }
}

#[async_trait]
impl ByteCache for MemoryByteCache {
    async fn get(&self, key: &str) -> Option<Bytes> {
        let mut cache = self.cache.write().await;

        let expired = match cache.get(key) {
            Some(entry) if entry.inserted_at.elapsed() <= self.ttl => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.data.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            if let Some(entry) = cache.pop(key) {
                self.stats.expired.fetch_add(1, Ordering::Relaxed);
                self.stats
                    .size_bytes
                    .fetch_sub(entry.data.len() as u64, Ordering::Relaxed);
                self.stats.entry_count.fetch_sub(1, Ordering::Relaxed);
                debug!(key, "Expired identicon cache entry");
            }
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    async fn put(&self, key: &str, data: Bytes) {
        let size = data.len() as u64;
        if size > self.max_bytes {
            debug!(key, size, "Identicon larger than cache limit, not cached");
            return;
        }

        let mut cache = self.cache.write().await;

        // Drop any previous entry first so its bytes don't count toward eviction.
        if let Some(existing) = cache.pop(key) {
            self.stats
                .size_bytes
                .fetch_sub(existing.data.len() as u64, Ordering::Relaxed);
            self.stats.entry_count.fetch_sub(1, Ordering::Relaxed);
        }

        if self.stats.size_bytes.load(Ordering::Relaxed) + size > self.max_bytes {
            self.evict_locked(&mut cache, size);
        }

        cache.put(
            key.to_string(),
            CachedImage {
                data,
                inserted_at: Instant::now(),
            },
        );
        self.stats.size_bytes.fetch_add(size, Ordering::Relaxed);
        self.stats.entry_count.fetch_add(1, Ordering::Relaxed);
    }

    async fn remove(&self, key: &str) {
        let mut cache = self.cache.write().await;
        if let Some(entry) = cache.pop(key) {
            self.stats
                .size_bytes
                .fetch_sub(entry.data.len() as u64, Ordering::Relaxed);
            self.stats.entry_count.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Clear all cached entries and reset statistics.
    async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
        self.stats.reset();
    }

    fn stats(&self) -> CacheSnapshot {
        self.stats.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_basic_operations() {
        let cache = MemoryByteCache::new(100, 60);

        assert!(cache.is_empty());
        assert!(cache.get("icon1").await.is_none());

        let data = Bytes::from("png bytes");
        cache.put("icon1", data.clone()).await;
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("icon1").await, Some(data));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entry_count, 1);
        assert!((stats.hit_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_cache_ttl_expiration() {
        let cache = MemoryByteCache::with_max_bytes(1024, Duration::from_millis(100));
        cache.put("icon1", Bytes::from("data")).await;
        assert!(cache.get("icon1").await.is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get("icon1").await.is_none());
        let stats = cache.stats();
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.size_bytes, 0);
    }

    #[tokio::test]
    async fn test_cache_memory_based_eviction() {
        let cache = MemoryByteCache::new(1, 60);

        let icon_100kb = Bytes::from(vec![0u8; 100 * 1024]);
        for i in 0..15 {
            cache.put(&format!("icon{}", i), icon_100kb.clone()).await;
        }

        let stats = cache.stats();
        assert!(stats.evictions > 0);
        assert!(stats.eviction_runs > 0);
        assert!(stats.size_bytes <= 1024 * 1024);
        // most recent entry always survives
        assert!(cache.get("icon14").await.is_some());
        // oldest was evicted first
        assert!(cache.get("icon0").await.is_none());
    }

    #[tokio::test]
    async fn test_eviction_with_tiny_limit() {
        let cache = MemoryByteCache::with_max_bytes(10, Duration::from_secs(60));
        cache.put("a", Bytes::from("123456")).await;
        cache.put("b", Bytes::from("123456")).await;
        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_some());
        assert_eq!(cache.size_bytes(), 6);
    }

    #[tokio::test]
    async fn test_oversized_entry_not_cached() {
        let cache = MemoryByteCache::with_max_bytes(4, Duration::from_secs(60));
        cache.put("big", Bytes::from("12345")).await;
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_replace_keeps_single_entry() {
        let cache = MemoryByteCache::new(100, 60);
        cache.put("icon1", Bytes::from("hello")).await;
        cache.put("icon2", Bytes::from("world!")).await;
        assert_eq!(cache.size_bytes(), 11);

        cache.put("icon1", Bytes::from("hello world")).await;
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.size_bytes(), 17);
        assert_eq!(cache.get("icon1").await, Some(Bytes::from("hello world")));
    }

    #[tokio::test]
    async fn test_remove() {
        let cache = MemoryByteCache::new(100, 60);
        cache.put("icon1", Bytes::from("data1")).await;
        cache.remove("icon1").await;
        cache.remove("missing").await;
        assert!(cache.is_empty());
        assert_eq!(cache.size_bytes(), 0);
        assert!(cache.get("icon1").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_clear() {
        let cache = MemoryByteCache::new(100, 60);
        cache.put("icon1", Bytes::from("data1")).await;
        cache.put("icon2", Bytes::from("data2")).await;
        cache.get("icon1").await;

        cache.clear().await;
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheSnapshot::default());
    }

    #[tokio::test]
    async fn test_utilization() {
        let cache = MemoryByteCache::new(1, 60);
        assert_eq!(cache.utilization(), 0.0);

        cache.put("icon1", Bytes::from(vec![0u8; 512 * 1024])).await;
        assert!((cache.utilization() - 0.5).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_concurrent_access() {
        let cache = std::sync::Arc::new(MemoryByteCache::new(10, 60));
        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let key = format!("icon{}", i % 4);
                cache.put(&key, Bytes::from(vec![i as u8; 64])).await;
                cache.get(&key).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.size_bytes(), 4 * 64);
    }
}
