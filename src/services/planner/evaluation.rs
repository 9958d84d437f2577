use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::{DurationPolicy, PlannerConfig};
use crate::constants::UNKNOWN_DURATION;
use crate::models::{CandidateRoute, Coordinates, RouteResult, SegmentKey};

use super::segment_resolver::SegmentResolver;

/// Walks candidate routes leg by leg and totals them.
pub struct RouteEvaluator {
    resolver: Arc<SegmentResolver>,
    duration_policy: DurationPolicy,
    max_concurrent: usize,
}

impl RouteEvaluator {
    pub fn new(resolver: Arc<SegmentResolver>, config: &PlannerConfig) -> Self {
        RouteEvaluator {
            resolver,
            duration_policy: config.duration_policy,
            max_concurrent: config.max_concurrent_evaluations,
        }
    }

    pub async fn evaluate_route(&self, origin: Coordinates, route: &CandidateRoute) -> RouteResult {
        walk_route(&self.resolver, self.duration_policy, origin, route).await
    }

    /// Evaluate every route concurrently, one task per route.
    ///
    /// Results come back in `routes` order regardless of completion order.
    /// Dropping the returned future aborts all outstanding evaluations.
    pub async fn evaluate_all(
        &self,
        origin: Coordinates,
        routes: Vec<CandidateRoute>,
    ) -> Vec<RouteResult> {
        let total = routes.len();
        let semaphore = (self.max_concurrent > 0)
            .then(|| Arc::new(Semaphore::new(self.max_concurrent)));
        let mut tasks = JoinSet::new();

        for (index, route) in routes.into_iter().enumerate() {
            let resolver = Arc::clone(&self.resolver);
            let semaphore = semaphore.clone();
            let policy = self.duration_policy;

            tasks.spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                (index, walk_route(&resolver, policy, origin, &route).await)
            });
        }

        let mut slots: Vec<Option<RouteResult>> = vec![None; total];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => tracing::error!(error = %e, "Route evaluation task failed"),
            }
        }

        slots.into_iter().flatten().collect()
    }
}

/// Legs run strictly in sequence: each starts where the previous one ended.
async fn walk_route(
    resolver: &SegmentResolver,
    policy: DurationPolicy,
    origin: Coordinates,
    route: &CandidateRoute,
) -> RouteResult {
    let mut per_leg_distance = Vec::with_capacity(route.len());
    let mut per_leg_duration = Vec::with_capacity(route.len());
    let mut current = origin;

    for place in route.places() {
        let resolved = resolver
            .resolve(SegmentKey::new(current, place.location))
            .await;
        per_leg_distance.push(resolved.segment.distance_meters);
        per_leg_duration.push(resolved.segment.duration_minutes());
        current = place.location;
    }

    let total_distance_meters = per_leg_distance.iter().sum();
    let duration_complete = per_leg_duration.iter().all(|&m| m != UNKNOWN_DURATION);
    let total_duration_minutes = match policy {
        DurationPolicy::SuppressPartial if !duration_complete => UNKNOWN_DURATION,
        _ => per_leg_duration
            .iter()
            .filter(|&&m| m != UNKNOWN_DURATION)
            .sum(),
    };

    RouteResult {
        places: route.places().to_vec(),
        total_distance_meters,
        total_duration_minutes,
        per_leg_distance,
        per_leg_duration,
        duration_complete,
    }
}
