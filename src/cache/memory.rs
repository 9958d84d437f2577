use crate::cache::{CacheStats, SegmentCache};
use crate::models::{Segment, SegmentKey};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// In-memory segment cache backed by moka.
/// All methods take `&self`; moka handles synchronisation.
///
/// There is no capacity bound: entries are never evicted under pressure, so
/// a segment stays available for the whole planning request that fetched it.
pub struct MemorySegmentCache {
    segments: Cache<SegmentKey, Segment>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemorySegmentCache {
    /// Cache that keeps entries for the life of the process.
    pub fn new() -> Self {
        Self::with_cache(Cache::builder().build())
    }

    /// Long-lived cache whose entries expire after `ttl_seconds`.
    /// The TTL must exceed the duration of a planning request; 0 disables expiry.
    pub fn with_ttl(ttl_seconds: u64) -> Self {
        if ttl_seconds == 0 {
            return Self::new();
        }
        Self::with_cache(
            Cache::builder()
                .time_to_live(Duration::from_secs(ttl_seconds))
                .build(),
        )
    }

    fn with_cache(segments: Cache<SegmentKey, Segment>) -> Self {
        MemorySegmentCache {
            segments,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.segments.entry_count()
    }
}

impl Default for MemorySegmentCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SegmentCache for MemorySegmentCache {
    async fn get(&self, key: &SegmentKey) -> Option<Segment> {
        match self.segments.get(key).await {
            Some(segment) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(?key, "Memory cache hit for segment");
                Some(segment)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(?key, "Memory cache miss for segment");
                None
            }
        }
    }

    async fn insert(&self, key: SegmentKey, segment: Segment) {
        self.segments.insert(key, segment).await;
    }

    async fn get_stats(&self) -> CacheStats {
        CacheStats::from_counts(
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            true,
        )
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use std::sync::Arc;

    fn key(offset: f64) -> SegmentKey {
        SegmentKey::new(
            Coordinates::new(37.5 + offset, 127.0).unwrap(),
            Coordinates::new(37.6, 127.1 + offset).unwrap(),
        )
    }

    #[tokio::test]
    async fn cache_miss() {
        let cache = MemorySegmentCache::new();
        assert!(cache.get(&key(0.0)).await.is_none());
    }

    #[tokio::test]
    async fn roundtrip() {
        let cache = MemorySegmentCache::new();
        cache.insert(key(0.0), Segment::new(1200.0, 300)).await;

        assert_eq!(cache.get(&key(0.0)).await, Some(Segment::new(1200.0, 300)));
        assert!(cache.get(&key(0.001)).await.is_none());
    }

    #[tokio::test]
    async fn stats_tracking() {
        let cache = MemorySegmentCache::new();
        cache.insert(key(0.0), Segment::new(1200.0, 300)).await;

        // 1 miss
        cache.get(&key(0.5)).await;
        // 2 hits
        cache.get(&key(0.0)).await;
        cache.get(&key(0.0)).await;

        let stats = cache.get_stats().await;
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 66.666).abs() < 1.0);
    }

    #[tokio::test]
    async fn concurrent_inserts_and_reads() {
        let cache = Arc::new(MemorySegmentCache::new());
        let mut handles = Vec::new();

        for i in 0..32 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let k = key((i % 8) as f64 * 0.01);
                cache.insert(k, Segment::new(100.0 * (i % 8) as f64, 60)).await;
                cache.get(&k).await
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }

        cache.segments.run_pending_tasks().await;
        assert_eq!(cache.entry_count(), 8);
        for i in 0..8 {
            assert_eq!(
                cache.get(&key(i as f64 * 0.01)).await,
                Some(Segment::new(100.0 * i as f64, 60))
            );
        }
    }

    #[tokio::test]
    async fn backend_name_is_memory() {
        let cache = MemorySegmentCache::default();
        assert_eq!(cache.backend_name(), "memory");
        assert!(cache.health_check().await);
    }

    #[tokio::test]
    async fn ttl_expiry() {
        let cache = MemorySegmentCache::with_ttl(1); // 1 second TTL
        cache.insert(key(0.0), Segment::new(1200.0, 300)).await;

        assert!(cache.get(&key(0.0)).await.is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(cache.get(&key(0.0)).await.is_none());
    }

    #[tokio::test]
    async fn zero_ttl_keeps_entries() {
        let cache = MemorySegmentCache::with_ttl(0);
        cache.insert(key(0.0), Segment::new(1200.0, 300)).await;

        assert_eq!(cache.get(&key(0.0)).await, Some(Segment::new(1200.0, 300)));
    }
}
