use crate::cache::{segment_cache_key, CacheStats, SegmentCache};
use crate::error::{AppError, Result};
use crate::models::{Segment, SegmentKey};
use ::redis::aio::ConnectionManager;
use ::redis::AsyncCommands;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

/// Redis-backed segment cache, for amortising segments across processes.
/// `ConnectionManager` is `Arc`-based internally; each call clones it.
///
/// Redis errors degrade to a cache miss; they never fail a planning request.
pub struct RedisSegmentCache {
    connection: ConnectionManager,
    segment_ttl: u64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RedisSegmentCache {
    pub async fn new(redis_url: &str, segment_ttl: u64) -> Result<Self> {
        let client = ::redis::Client::open(redis_url)
            .map_err(|e| AppError::Cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Cache(format!("Failed to connect to Redis: {}", e)))?;

        tracing::info!("Redis cache connection established");

        Ok(RedisSegmentCache {
            connection,
            segment_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }
}

#[async_trait]
impl SegmentCache for RedisSegmentCache {
    async fn get(&self, key: &SegmentKey) -> Option<Segment> {
        let cache_key = segment_cache_key(key);
        let mut conn = self.connection.clone();
        let result: ::redis::RedisResult<Option<String>> = conn.get(&cache_key).await;

        let segment = match result {
            Ok(Some(json)) => match serde_json::from_str::<Segment>(&json) {
                Ok(segment) => Some(segment),
                Err(e) => {
                    tracing::warn!("Failed to deserialize cached segment: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Redis error getting segment: {}", e);
                None
            }
        };

        if segment.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Cache hit for segment: {}", cache_key);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Cache miss for segment: {}", cache_key);
        }
        segment
    }

    async fn insert(&self, key: SegmentKey, segment: Segment) {
        let cache_key = segment_cache_key(&key);
        let json = match serde_json::to_string(&segment) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("Failed to serialize segment for cache: {}", e);
                return;
            }
        };

        let mut conn = self.connection.clone();
        // SET EX rejects 0, so a zero TTL stores without expiry
        let result: ::redis::RedisResult<()> = if self.segment_ttl == 0 {
            conn.set(&cache_key, json).await
        } else {
            conn.set_ex(&cache_key, json, self.segment_ttl).await
        };

        match result {
            Ok(()) => {
                tracing::debug!(
                    "Cached segment with TTL {}s: {}",
                    self.segment_ttl,
                    cache_key
                );
            }
            Err(e) => {
                tracing::warn!("Failed to cache segment: {}", e);
            }
        }
    }

    async fn get_stats(&self) -> CacheStats {
        CacheStats::from_counts(
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.health_check().await,
        )
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.connection.clone();
        let result: ::redis::RedisResult<String> =
            ::redis::cmd("PING").query_async(&mut conn).await;
        result.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
