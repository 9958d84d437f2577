use crate::constants::UNKNOWN_DURATION;
use crate::models::{Coordinates, Place};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the route space is explored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanStrategy {
    /// Every ordering of every k-subset of the saved places.
    #[default]
    Exhaustive,
    /// A single nearest-neighbor tour over the k closest places.
    Greedy,
}

impl fmt::Display for PlanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStrategy::Exhaustive => write!(f, "exhaustive"),
            PlanStrategy::Greedy => write!(f, "greedy"),
        }
    }
}

impl FromStr for PlanStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exhaustive" | "brute_force" => Ok(PlanStrategy::Exhaustive),
            "greedy" | "nearest_neighbor" => Ok(PlanStrategy::Greedy),
            _ => Err(format!("Invalid plan strategy: '{}'", s)),
        }
    }
}

/// One proposed visiting order. Never repeats a place, never contains the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRoute {
    places: Vec<Place>,
}

impl CandidateRoute {
    pub fn new(places: Vec<Place>) -> Self {
        CandidateRoute { places }
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

/// An evaluated candidate route with its per-leg breakdown.
///
/// Leg `i` runs from the previous stop (the origin for `i == 0`) to
/// `places[i]`. A per-leg duration of `-1` marks a geometric fallback leg.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteResult {
    pub places: Vec<Place>,
    pub total_distance_meters: f64,
    pub total_duration_minutes: i64,
    pub per_leg_distance: Vec<f64>,
    pub per_leg_duration: Vec<i64>,
    /// False when at least one leg's duration is unknown
    pub duration_complete: bool,
}

impl RouteResult {
    pub fn fallback_leg_count(&self) -> usize {
        self.per_leg_duration
            .iter()
            .filter(|&&minutes| minutes == UNKNOWN_DURATION)
            .count()
    }
}

// Request/Response types for API endpoints

#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    /// Free-text start location, resolved through keyword search
    #[serde(default)]
    pub start_keyword: Option<String>,
    /// Explicit start coordinates
    #[serde(default)]
    pub start_point: Option<Coordinates>,
    pub visit_count: usize,
    #[serde(default)]
    pub strategy: PlanStrategy,
}

impl PlanRequest {
    pub fn validate(&self) -> Result<(), String> {
        match (&self.start_keyword, &self.start_point) {
            (Some(_), Some(_)) => {
                return Err("Provide either start_keyword or start_point, not both".to_string())
            }
            (None, None) => return Err("start_keyword or start_point is required".to_string()),
            (Some(keyword), None) if keyword.trim().is_empty() => {
                return Err("start_keyword must not be blank".to_string())
            }
            (None, Some(point)) => {
                Coordinates::new(point.lat, point.lng)?;
            }
            _ => {}
        }
        if self.visit_count == 0 {
            return Err("visit_count must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Informational notice attached to a successful plan.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanAdvisory {
    /// The routing service failed for some legs; straight-line distance was used.
    SegmentUnavailable { fallback_legs: usize },
}

impl fmt::Display for PlanAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanAdvisory::SegmentUnavailable { fallback_legs } => write!(
                f,
                "Routing service unavailable for {} leg(s); straight-line distance used",
                fallback_legs
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanOutcome {
    pub origin: Coordinates,
    pub strategy: PlanStrategy,
    pub route: RouteResult,
    pub evaluated_routes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<PlanAdvisory>,
}
