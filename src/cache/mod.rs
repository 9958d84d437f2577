mod memory;
mod redis;

pub use memory::MemorySegmentCache;
pub use self::redis::RedisSegmentCache;

use crate::constants::SEGMENT_CACHE_KEY_PREFIX;
use crate::models::{Segment, SegmentKey};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Segment cache shared by every route evaluated for a planning request.
///
/// Implementations must tolerate concurrent `get`/`insert` from many tasks.
/// Two concurrent misses on the same key may both reach the routing service;
/// the later `insert` simply overwrites the earlier one.
#[async_trait]
pub trait SegmentCache: Send + Sync {
    async fn get(&self, key: &SegmentKey) -> Option<Segment>;
    async fn insert(&self, key: SegmentKey, segment: Segment);
    async fn get_stats(&self) -> CacheStats;
    async fn health_check(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub connected: bool,
}

impl CacheStats {
    pub fn from_counts(hits: u64, misses: u64, connected: bool) -> Self {
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
            connected,
        }
    }
}

/// String form of a segment key for external stores.
/// Rust's `f64` Display round-trips exactly, so distinct keys never collide.
pub fn segment_cache_key(key: &SegmentKey) -> String {
    format!(
        "{}:{},{}:{},{}",
        SEGMENT_CACHE_KEY_PREFIX, key.from.lat, key.from.lng, key.to.lat, key.to.lng
    )
}
