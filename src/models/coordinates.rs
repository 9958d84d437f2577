use crate::constants::EARTH_RADIUS_METERS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Calculate distance between two coordinates using Haversine formula
    /// Returns distance in meters
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        haversine_distance(self, other)
    }

    /// Round coordinates to specified decimal places for caching
    pub fn round(&self, decimal_places: u32) -> Self {
        let multiplier = 10_f64.powi(decimal_places as i32);
        Coordinates {
            lat: (self.lat * multiplier).round() / multiplier,
            lng: (self.lng * multiplier).round() / multiplier,
        }
    }

    /// Format as the `"lng,lat"` pair the Kakao APIs expect.
    pub fn to_lng_lat(&self) -> String {
        format!("{},{}", self.lng, self.lat)
    }
}

/// Great-circle distance in meters between two points.
pub fn haversine_distance(a: &Coordinates, b: &Coordinates) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(37.5547, 126.9707).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err()); // Invalid lat
        assert!(Coordinates::new(0.0, 181.0).is_err()); // Invalid lng
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_distance_calculation() {
        let seoul_station = Coordinates::new(37.5547, 126.9707).unwrap();
        let busan_station = Coordinates::new(35.1151, 129.0422).unwrap();

        let distance = seoul_station.distance_to(&busan_station);
        // Seoul Station to Busan Station is roughly 325 km as the crow flies
        assert!((distance - 325_000.0).abs() < 10_000.0, "got {}", distance);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Coordinates::new(0.0, 0.0).unwrap();
        let b = Coordinates::new(1.0, 0.0).unwrap();
        let expected = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;
        assert!((a.distance_to(&b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_on_self() {
        let points = [
            Coordinates::new(37.5665, 126.9780).unwrap(),
            Coordinates::new(37.5796, 126.9770).unwrap(),
            Coordinates::new(-33.8688, 151.2093).unwrap(),
            Coordinates::new(64.1466, -21.9426).unwrap(),
        ];

        for a in &points {
            assert_eq!(haversine_distance(a, a), 0.0);
            for b in &points {
                assert_eq!(haversine_distance(a, b), haversine_distance(b, a));
            }
        }
    }

    #[test]
    fn test_rounding() {
        let coords = Coordinates::new(37.566535, 126.977969).unwrap();
        let rounded = coords.round(3);
        assert_eq!(rounded.lat, 37.567);
        assert_eq!(rounded.lng, 126.978);
    }

    #[test]
    fn test_lng_lat_format() {
        let coords = Coordinates::new(37.5, 127.25).unwrap();
        assert_eq!(coords.to_lng_lat(), "127.25,37.5");
    }
}
