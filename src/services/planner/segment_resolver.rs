use std::sync::Arc;
use std::time::Duration;

use crate::cache::SegmentCache;
use crate::config::PlannerConfig;
use crate::models::{Segment, SegmentKey};
use crate::services::routing::RoutingService;

/// Where a resolved segment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentSource {
    Cache,
    Remote,
    /// Routing service failed or timed out; straight-line estimate.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSegment {
    pub segment: Segment,
    pub source: SegmentSource,
}

/// Cache-first segment lookup with a geometric fallback.
pub struct SegmentResolver {
    routing: Arc<dyn RoutingService>,
    cache: Arc<dyn SegmentCache>,
    timeout: Duration,
    key_precision: Option<u32>,
}

impl SegmentResolver {
    pub fn new(
        routing: Arc<dyn RoutingService>,
        cache: Arc<dyn SegmentCache>,
        config: &PlannerConfig,
    ) -> Self {
        SegmentResolver {
            routing,
            cache,
            timeout: config.segment_timeout(),
            key_precision: config.segment_key_precision,
        }
    }

    /// Resolve one leg. Never fails.
    ///
    /// Only well-formed remote answers are cached, so a leg that fell back
    /// is retried against the routing service on its next lookup.
    pub async fn resolve(&self, key: SegmentKey) -> ResolvedSegment {
        let cache_key = key.rounded(self.key_precision);

        if let Some(segment) = self.cache.get(&cache_key).await {
            return ResolvedSegment {
                segment,
                source: SegmentSource::Cache,
            };
        }

        let outcome = tokio::time::timeout(self.timeout, self.routing.route(key.from, key.to)).await;

        let failure = match outcome {
            Ok(Ok(segment)) if segment.is_well_formed() => {
                self.cache.insert(cache_key, segment).await;
                return ResolvedSegment {
                    segment,
                    source: SegmentSource::Remote,
                };
            }
            Ok(Ok(segment)) => format!(
                "malformed segment ({} m, {} s)",
                segment.distance_meters, segment.duration_seconds
            ),
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {}ms", self.timeout.as_millis()),
        };

        tracing::warn!(
            from = %key.from.to_lng_lat(),
            to = %key.to.to_lng_lat(),
            reason = %failure,
            "Segment unavailable, using straight-line distance"
        );

        ResolvedSegment {
            segment: Segment::fallback(&key),
            source: SegmentSource::Fallback,
        }
    }
}
