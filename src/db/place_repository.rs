use crate::error::Result;
use crate::models::{Coordinates, Place};
use async_trait::async_trait;
use uuid::Uuid;

/// Raw place fields extracted from a database row, before validation.
pub(super) struct RawPlaceRow {
    pub id: String,
    pub display_name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl RawPlaceRow {
    /// Validate a row. Rows with an unusable id or location are skipped.
    pub fn into_place(self) -> Option<Place> {
        let id = match self.id.parse::<Uuid>() {
            Ok(id) => id,
            Err(_) => {
                tracing::warn!(
                    "Invalid UUID '{}' for place '{}', skipping",
                    self.id,
                    self.display_name
                );
                return None;
            }
        };

        let location = match Coordinates::new(self.lat, self.lng) {
            Ok(location) => location,
            Err(e) => {
                tracing::error!(
                    "Invalid coordinates for place '{}' (id: {}): {}. Skipping.",
                    self.display_name,
                    id,
                    e
                );
                return None;
            }
        };

        Some(Place {
            id,
            display_name: self.display_name,
            address: self.address,
            location,
        })
    }
}

/// Store of the user's saved places.
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    /// All saved places in insertion order.
    async fn list_all(&self) -> Result<Vec<Place>>;

    async fn insert(&self, place: &Place) -> Result<()>;

    /// Returns false when no place had this id.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Returns the number of places removed.
    async fn delete_all(&self) -> Result<u64>;

    async fn count(&self) -> Result<i64>;
}
