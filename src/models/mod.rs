pub mod coordinates;
pub mod place;
pub mod route;
pub mod segment;

pub use coordinates::{haversine_distance, Coordinates};
pub use place::{NewPlaceRequest, Place, PlaceCandidate};
pub use route::{CandidateRoute, PlanAdvisory, PlanOutcome, PlanRequest, PlanStrategy, RouteResult};
pub use segment::{Segment, SegmentKey};
