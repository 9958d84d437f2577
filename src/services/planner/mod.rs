mod candidate_selection;
mod enumeration;
mod evaluation;
mod segment_resolver;
mod selection;

pub use candidate_selection::select_candidates;
pub use enumeration::{exhaustive_routes, greedy_route, route_space_size, RouteEnumerator};
pub use evaluation::RouteEvaluator;
pub use segment_resolver::{ResolvedSegment, SegmentResolver, SegmentSource};
pub use selection::select_best;

use std::sync::Arc;
use std::time::Instant;

use crate::cache::SegmentCache;
use crate::config::PlannerConfig;
use crate::db::PlaceRepository;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, Place, PlanAdvisory, PlanOutcome, PlanRequest, PlanStrategy};
use crate::services::keyword_search::KeywordSearch;
use crate::services::routing::RoutingService;

/// Plans the shortest visiting order through the user's saved places.
///
/// One planner is shared by every request; the segment cache it holds
/// outlives individual requests.
pub struct RoutePlanner {
    places: Arc<dyn PlaceRepository>,
    keyword_search: Arc<dyn KeywordSearch>,
    enumerator: RouteEnumerator,
    evaluator: RouteEvaluator,
}

impl RoutePlanner {
    pub fn new(
        places: Arc<dyn PlaceRepository>,
        keyword_search: Arc<dyn KeywordSearch>,
        routing: Arc<dyn RoutingService>,
        cache: Arc<dyn SegmentCache>,
        config: PlannerConfig,
    ) -> Self {
        let resolver = Arc::new(SegmentResolver::new(routing, cache, &config));

        RoutePlanner {
            places,
            keyword_search,
            enumerator: RouteEnumerator::new(&config),
            evaluator: RouteEvaluator::new(resolver, &config),
        }
    }

    /// Full planning request: resolve the start, load saved places, plan.
    pub async fn plan(&self, request: &PlanRequest) -> Result<PlanOutcome> {
        request.validate().map_err(AppError::InvalidRequest)?;

        let origin = match (&request.start_point, &request.start_keyword) {
            (Some(point), _) => *point,
            (None, Some(keyword)) => self.resolve_origin(keyword).await?,
            (None, None) => {
                return Err(AppError::InvalidRequest(
                    "start_keyword or start_point is required".to_string(),
                ))
            }
        };

        let places = match self.places.list_all().await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load saved places, planning with none");
                Vec::new()
            }
        };

        self.plan_from_origin(origin, &places, request.visit_count, request.strategy)
            .await
    }

    /// Location of the first keyword search hit.
    ///
    /// A failed search is reported the same as an empty one.
    pub async fn resolve_origin(&self, keyword: &str) -> Result<Coordinates> {
        let candidates = match self.keyword_search.search(keyword).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(error = %e, keyword, "Origin lookup failed");
                Vec::new()
            }
        };

        let origin = candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::OriginNotFound(keyword.to_string()))?;

        tracing::debug!(
            keyword,
            place = %origin.place_name,
            lat = origin.location.lat,
            lng = origin.location.lng,
            "Resolved origin"
        );
        Ok(origin.location)
    }

    /// Plan from a known origin over `places`.
    pub async fn plan_from_origin(
        &self,
        origin: Coordinates,
        places: &[Place],
        visit_count: usize,
        strategy: PlanStrategy,
    ) -> Result<PlanOutcome> {
        if visit_count == 0 {
            return Err(AppError::InvalidRequest(
                "visit_count must be at least 1".to_string(),
            ));
        }

        let started = Instant::now();

        let candidates = select_candidates(&origin, places, visit_count, strategy)?;
        let routes = self
            .enumerator
            .enumerate(&origin, &candidates, visit_count, strategy)?;

        if routes.is_empty() {
            return Err(AppError::NoRouteComputed(format!(
                "{} candidate places cannot fill {} visits",
                candidates.len(),
                visit_count
            )));
        }

        let results = self.evaluator.evaluate_all(origin, routes).await;
        let evaluated_routes = results.len();
        let fallback_legs: usize = results.iter().map(|r| r.fallback_leg_count()).sum();

        let route = select_best(results).ok_or_else(|| {
            AppError::NoRouteComputed("no candidate route could be evaluated".to_string())
        })?;

        let advisory = (fallback_legs > 0).then(|| {
            let advisory = PlanAdvisory::SegmentUnavailable { fallback_legs };
            tracing::warn!(fallback_legs, "{}", advisory);
            advisory
        });

        tracing::info!(
            strategy = %strategy,
            candidates = candidates.len(),
            evaluated = evaluated_routes,
            distance_m = route.total_distance_meters,
            duration_min = route.total_duration_minutes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Planned {}-stop route: {:.0}m",
            route.places.len(),
            route.total_distance_meters
        );

        Ok(PlanOutcome {
            origin,
            strategy,
            route,
            evaluated_routes,
            advisory,
        })
    }
}
