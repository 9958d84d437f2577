// Library exports for testing and reusability

pub mod cache;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

// App state for sharing across the application
use cache::SegmentCache;
use db::PlaceRepository;
use services::keyword_search::KeywordSearch;
use services::planner::RoutePlanner;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct AppState {
    pub db_pool: SqlitePool,
    pub place_repo: Arc<dyn PlaceRepository>,
    pub keyword_search: Arc<dyn KeywordSearch>,
    pub planner: RoutePlanner,
    pub cache: Arc<dyn SegmentCache>,
}
