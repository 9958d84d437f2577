use crate::error::{AppError, Result};
use crate::models::{Coordinates, Place, PlanStrategy};

/// Saved places eligible for a route from `origin`.
///
/// Places at exactly the origin's coordinates are dropped. The rest are
/// ordered by straight-line distance from the origin, ties keeping their
/// saved order. The greedy strategy keeps only the `visit_count` nearest.
pub fn select_candidates(
    origin: &Coordinates,
    places: &[Place],
    visit_count: usize,
    strategy: PlanStrategy,
) -> Result<Vec<Place>> {
    let mut candidates: Vec<(f64, &Place)> = places
        .iter()
        .filter(|place| place.location != *origin)
        .map(|place| (origin.distance_to(&place.location), place))
        .collect();

    if candidates.is_empty() {
        return Err(AppError::EmptyCandidateSet);
    }

    // sort_by is stable
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

    if strategy == PlanStrategy::Greedy {
        candidates.truncate(visit_count);
    }

    tracing::debug!(
        saved = places.len(),
        candidates = candidates.len(),
        strategy = %strategy,
        "Selected {} candidate places",
        candidates.len()
    );

    Ok(candidates.into_iter().map(|(_, place)| place.clone()).collect())
}
