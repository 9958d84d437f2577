use crate::constants::UNKNOWN_DURATION;
use crate::models::coordinates::{haversine_distance, Coordinates};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Directed leg used as the segment cache key.
///
/// Equality is exact `f64` equality on both endpoints, so legs whose
/// coordinates drifted by a rounding error miss the cache. Use
/// [`SegmentKey::rounded`] to trade exactness for hit rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SegmentKey {
    pub from: Coordinates,
    pub to: Coordinates,
}

impl SegmentKey {
    pub fn new(from: Coordinates, to: Coordinates) -> Self {
        SegmentKey { from, to }
    }

    /// Key with both endpoints rounded to `precision` decimal places.
    pub fn rounded(&self, precision: Option<u32>) -> Self {
        match precision {
            Some(places) => SegmentKey {
                from: self.from.round(places),
                to: self.to.round(places),
            },
            None => *self,
        }
    }

    /// Straight-line length of the leg in meters.
    pub fn geometric_distance(&self) -> f64 {
        haversine_distance(&self.from, &self.to)
    }
}

impl PartialEq for SegmentKey {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

// Coordinates are validated finite, so `==` is reflexive here.
impl Eq for SegmentKey {}

impl Hash for SegmentKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for value in [self.from.lat, self.from.lng, self.to.lat, self.to.lng] {
            hash_bits(value).hash(state);
        }
    }
}

/// Bit pattern consistent with `==`: `0.0` and `-0.0` hash alike.
fn hash_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

/// Distance/duration estimate for a single leg.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub distance_meters: f64,
    /// `-1` when the duration is unknown (geometric fallback)
    pub duration_seconds: i64,
}

impl Segment {
    pub fn new(distance_meters: f64, duration_seconds: i64) -> Self {
        Segment {
            distance_meters,
            duration_seconds,
        }
    }

    /// Straight-line estimate for a leg the routing service could not resolve.
    pub fn fallback(key: &SegmentKey) -> Self {
        Segment {
            distance_meters: key.geometric_distance(),
            duration_seconds: UNKNOWN_DURATION,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.duration_seconds == UNKNOWN_DURATION
    }

    /// A remote estimate worth caching: finite, non-negative, known duration.
    pub fn is_well_formed(&self) -> bool {
        self.distance_meters.is_finite() && self.distance_meters >= 0.0 && self.duration_seconds >= 0
    }

    /// Whole minutes (truncating), or `-1` when unknown.
    pub fn duration_minutes(&self) -> i64 {
        if self.is_fallback() {
            UNKNOWN_DURATION
        } else {
            self.duration_seconds / 60
        }
    }
}
