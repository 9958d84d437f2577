use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A place the user has saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Place {
    pub id: Uuid,
    pub display_name: String,
    pub address: String,
    pub location: Coordinates,
}

impl Place {
    pub fn new(display_name: String, address: String, location: Coordinates) -> Self {
        Place {
            id: Uuid::new_v4(),
            display_name,
            address,
            location,
        }
    }
}

/// A keyword search hit. The first one is used as the planning origin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceCandidate {
    pub place_name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_address: Option<String>,
    pub location: Coordinates,
}

impl PlaceCandidate {
    /// Save a search hit as a place, preferring the road address when present.
    pub fn into_place(self) -> Place {
        let address = match self.road_address {
            Some(road) if !road.trim().is_empty() => road,
            _ => self.address,
        };
        Place::new(self.place_name, address, self.location)
    }
}

#[derive(Debug, Deserialize)]
pub struct NewPlaceRequest {
    pub display_name: String,
    #[serde(default)]
    pub address: String,
    pub location: Coordinates,
}

impl NewPlaceRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.display_name.trim().is_empty() {
            return Err("display_name must not be empty".to_string());
        }
        Coordinates::new(self.location.lat, self.location.lng)?;
        Ok(())
    }

    pub fn into_place(self) -> Place {
        Place::new(self.display_name, self.address, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_prefers_road_address() {
        let candidate = PlaceCandidate {
            place_name: "Gyeongbokgung".to_string(),
            address: "Sejong-ro 1-1".to_string(),
            road_address: Some("161 Sajik-ro".to_string()),
            location: Coordinates::new(37.5796, 126.9770).unwrap(),
        };

        let place = candidate.into_place();
        assert_eq!(place.display_name, "Gyeongbokgung");
        assert_eq!(place.address, "161 Sajik-ro");
    }

    #[test]
    fn test_candidate_blank_road_address_falls_back() {
        let candidate = PlaceCandidate {
            place_name: "Cafe".to_string(),
            address: "Jongno-gu 12".to_string(),
            road_address: Some("  ".to_string()),
            location: Coordinates::new(37.57, 126.98).unwrap(),
        };

        assert_eq!(candidate.into_place().address, "Jongno-gu 12");
    }

    #[test]
    fn test_new_place_request_validation() {
        let mut req = NewPlaceRequest {
            display_name: "N Seoul Tower".to_string(),
            address: String::new(),
            location: Coordinates { lat: 37.5512, lng: 126.9882 },
        };
        assert!(req.validate().is_ok());

        req.location.lat = 120.0;
        assert!(req.validate().is_err());

        req.location.lat = 37.5512;
        req.display_name = " ".to_string();
        assert!(req.validate().is_err());
    }
}
