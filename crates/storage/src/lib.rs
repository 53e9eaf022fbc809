//! Caching abstractions for identicon services.
//!
//! Provides:
//! - [`ByteCache`]: the async key to bytes interface handlers depend on
//! - [`MemoryByteCache`]: bounded in-process LRU with TTL and stats
//! - [`NoopCache`]: a cache that stores nothing

pub mod byte_cache;
pub mod memory_cache;

pub use byte_cache::{ByteCache, CacheSnapshot, NoopCache};
pub use memory_cache::{MemoryByteCache, MemoryCacheStats};
