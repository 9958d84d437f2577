use crate::models::RouteResult;

/// Shortest route by total distance; the earliest wins a tie.
pub fn select_best(results: Vec<RouteResult>) -> Option<RouteResult> {
    let mut best: Option<RouteResult> = None;
    for result in results {
        match &best {
            Some(current) if result.total_distance_meters >= current.total_distance_meters => {}
            _ => best = Some(result),
        }
    }
    best
}
