use crate::config::PlannerConfig;
use crate::error::{AppError, Result};
use crate::models::{CandidateRoute, Coordinates, Place, PlanStrategy};

/// Builds the candidate routes for a strategy, refusing route spaces too
/// large to evaluate.
#[derive(Debug, Clone)]
pub struct RouteEnumerator {
    max_exhaustive_visits: usize,
    max_candidate_routes: u64,
}

impl RouteEnumerator {
    pub fn new(config: &PlannerConfig) -> Self {
        RouteEnumerator {
            max_exhaustive_visits: config.max_exhaustive_visits,
            max_candidate_routes: config.max_candidate_routes,
        }
    }

    /// Candidate routes over `candidates`, which must already be ordered
    /// (and for greedy, truncated) by the candidate selector.
    ///
    /// Exhaustive enumeration with more visits than candidates yields no
    /// routes; the caller reports that as "no route computed".
    pub fn enumerate(
        &self,
        origin: &Coordinates,
        candidates: &[Place],
        visit_count: usize,
        strategy: PlanStrategy,
    ) -> Result<Vec<CandidateRoute>> {
        match strategy {
            PlanStrategy::Greedy => {
                let route = greedy_route(origin, candidates, visit_count);
                if route.is_empty() {
                    Ok(Vec::new())
                } else {
                    Ok(vec![route])
                }
            }
            PlanStrategy::Exhaustive => {
                if visit_count > self.max_exhaustive_visits {
                    return Err(AppError::RouteSpaceTooLarge(format!(
                        "visit_count {} exceeds the exhaustive limit of {}",
                        visit_count, self.max_exhaustive_visits
                    )));
                }

                match route_space_size(candidates.len(), visit_count) {
                    Some(size) if size <= self.max_candidate_routes => {
                        tracing::debug!(
                            candidates = candidates.len(),
                            visit_count,
                            routes = size,
                            "Enumerating {} candidate routes",
                            size
                        );
                        Ok(exhaustive_routes(candidates, visit_count))
                    }
                    size => Err(AppError::RouteSpaceTooLarge(format!(
                        "{} places choose {} gives {} routes (limit {})",
                        candidates.len(),
                        visit_count,
                        size.map_or_else(|| "too many".to_string(), |s| s.to_string()),
                        self.max_candidate_routes
                    ))),
                }
            }
        }
    }
}

/// Number of ordered routes visiting `k` of `n` places: C(n,k) * k!.
/// `None` on overflow.
pub fn route_space_size(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    ((n - k + 1)..=n).try_fold(1u64, |acc, factor| acc.checked_mul(factor as u64))
}

/// Every ordering of every `k`-subset of `candidates`.
///
/// Subsets come in include-first order (those containing the first
/// remaining element before those without it); each subset's orderings
/// follow in the order produced by [`permutations`].
pub fn exhaustive_routes(candidates: &[Place], k: usize) -> Vec<CandidateRoute> {
    if k == 0 || k > candidates.len() {
        return Vec::new();
    }

    let mut routes = Vec::new();
    for combination in combinations(candidates.len(), k) {
        for ordering in permutations(&combination) {
            routes.push(CandidateRoute::new(
                ordering.into_iter().map(|i| candidates[i].clone()).collect(),
            ));
        }
    }
    routes
}

/// Nearest-neighbor tour from `origin` over the first `k` candidates.
/// Ties go to the earliest candidate.
pub fn greedy_route(origin: &Coordinates, candidates: &[Place], k: usize) -> CandidateRoute {
    let mut remaining: Vec<&Place> = candidates.iter().take(k).collect();
    let mut route = Vec::with_capacity(remaining.len());
    let mut current = *origin;

    while !remaining.is_empty() {
        let mut nearest = 0;
        let mut nearest_distance = current.distance_to(&remaining[0].location);
        for (i, place) in remaining.iter().enumerate().skip(1) {
            let distance = current.distance_to(&place.location);
            if distance < nearest_distance {
                nearest = i;
                nearest_distance = distance;
            }
        }

        let next = remaining.remove(nearest);
        current = next.location;
        route.push(next.clone());
    }

    CandidateRoute::new(route)
}

/// Index sets of size `k` drawn from `0..n`, include-first.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn extend(start: usize, n: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        // Not enough elements left to fill the subset.
        if n - start < k - current.len() {
            return;
        }
        current.push(start);
        extend(start + 1, n, k, current, out);
        current.pop();
        extend(start + 1, n, k, current, out);
    }

    let mut out = Vec::new();
    extend(0, n, k, &mut Vec::with_capacity(k), &mut out);
    out
}

/// All orderings: each element in turn leads, followed by the orderings of
/// the rest.
fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }

    let mut out = Vec::new();
    for (i, &head) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}
