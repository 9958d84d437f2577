use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use findcourse::cache::MemorySegmentCache;
use findcourse::config::PlannerConfig;
use findcourse::db::{PlaceRepository, SqlitePlaceRepository};
use findcourse::models::{Coordinates, Place};
use findcourse::services::keyword_search::KeywordSearch;
use findcourse::services::planner::RoutePlanner;
use findcourse::services::test_support::StubRoutingService;
use findcourse::AppState;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;
use tower::ServiceExt;

/// Setup test database: a fresh in-memory SQLite store
#[allow(dead_code)]
pub async fn setup_test_db() -> SqlitePool {
    // A single connection, since each in-memory connection is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    SqlitePlaceRepository::create_schema(&pool)
        .await
        .expect("Failed to create schema");

    pool
}

/// Create a test place
#[allow(dead_code)]
pub fn create_test_place(name: &str, lat: f64, lng: f64) -> Place {
    Place::new(
        name.to_string(),
        format!("Test address: {}", name),
        Coordinates::new(lat, lng).unwrap(),
    )
}

/// Seoul City Hall, used as the planning origin throughout the tests
#[allow(dead_code)]
pub fn city_hall() -> Coordinates {
    Coordinates::new(37.5663, 126.9779).unwrap()
}

/// Router wired to an in-memory store and stubbed external services
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub place_repo: Arc<dyn PlaceRepository>,
    pub routing: Arc<StubRoutingService>,
}

#[allow(dead_code)]
pub async fn setup_test_app(
    keyword_search: Arc<dyn KeywordSearch>,
    routing: StubRoutingService,
) -> TestApp {
    let db_pool = setup_test_db().await;
    let place_repo: Arc<dyn PlaceRepository> =
        Arc::new(SqlitePlaceRepository::new(db_pool.clone()));
    let routing = Arc::new(routing);
    let cache = Arc::new(MemorySegmentCache::new());

    let planner = RoutePlanner::new(
        place_repo.clone(),
        keyword_search.clone(),
        routing.clone(),
        cache.clone(),
        PlannerConfig::default(),
    );

    let state = Arc::new(AppState {
        db_pool,
        place_repo: place_repo.clone(),
        keyword_search,
        planner,
        cache,
    });

    TestApp {
        router: findcourse::routes::create_router(state),
        place_repo,
        routing,
    }
}

/// Send a request and decode the JSON body (Null for an empty body)
#[allow(dead_code)]
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
