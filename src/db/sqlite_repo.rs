use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Place;

use super::place_repository::{PlaceRepository, RawPlaceRow};

#[derive(sqlx::FromRow)]
struct SqlitePlaceRow {
    id: String,
    display_name: String,
    address: String,
    lat: f64,
    lng: f64,
}

impl SqlitePlaceRow {
    fn into_place(self) -> Option<Place> {
        RawPlaceRow {
            id: self.id,
            display_name: self.display_name,
            address: self.address,
            lat: self.lat,
            lng: self.lng,
        }
        .into_place()
    }
}

pub struct SqlitePlaceRepository {
    pool: SqlitePool,
}

impl SqlitePlaceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the SQLite schema. Idempotent.
    pub async fn create_schema(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS places (
                rowid INTEGER PRIMARY KEY,
                id TEXT UNIQUE NOT NULL,
                display_name TEXT NOT NULL,
                address TEXT NOT NULL DEFAULT '',
                lat REAL NOT NULL,
                lng REAL NOT NULL
            )",
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl PlaceRepository for SqlitePlaceRepository {
    async fn list_all(&self) -> Result<Vec<Place>> {
        let rows: Vec<SqlitePlaceRow> = sqlx::query_as(
            "SELECT id, display_name, address, lat, lng FROM places ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let total = rows.len();
        let places: Vec<Place> = rows
            .into_iter()
            .filter_map(SqlitePlaceRow::into_place)
            .collect();

        if places.len() != total {
            tracing::warn!(
                skipped = total - places.len(),
                "Skipped {} invalid place rows",
                total - places.len()
            );
        }

        Ok(places)
    }

    async fn insert(&self, place: &Place) -> Result<()> {
        sqlx::query(
            "INSERT INTO places (id, display_name, address, lat, lng) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(place.id.to_string())
        .bind(&place.display_name)
        .bind(&place.address)
        .bind(place.location.lat)
        .bind(place.location.lng)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %place.id, name = %place.display_name, "Saved place");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM places WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM places")
            .execute(&self.pool)
            .await?;

        tracing::info!(removed = result.rows_affected(), "Deleted all saved places");
        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM places")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[path = "sqlite_repo_tests.rs"]
mod tests;
