//! Test doubles for the planner's external collaborators.
//!
//! [`StubRoutingService`], [`StubKeywordSearch`] and [`StubPlaceRepository`]
//! answer from memory and count their calls, so planning can be exercised
//! without network access or a database.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::PlaceRepository;
use crate::error::{AppError, Result};
use crate::models::{haversine_distance, Coordinates, Place, PlaceCandidate, Segment};
use crate::services::keyword_search::KeywordSearch;
use crate::services::routing::RoutingService;

#[derive(Debug, Clone)]
enum StubResponse {
    /// The same segment for every leg
    Fixed(Segment),
    /// Straight-line distance, duration derived from a constant speed
    Geometric { meters_per_second: f64 },
    Error(String),
}

/// Stub [`RoutingService`] answering from memory.
#[derive(Debug)]
pub struct StubRoutingService {
    response: StubResponse,
    delay: Option<Duration>,
    failing_destinations: HashSet<(u64, u64)>,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl StubRoutingService {
    fn with_response(response: StubResponse) -> Self {
        Self {
            response,
            delay: None,
            failing_destinations: HashSet::new(),
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    /// Every leg resolves to `segment`.
    #[must_use]
    pub fn fixed(segment: Segment) -> Self {
        Self::with_response(StubResponse::Fixed(segment))
    }

    /// Legs resolve to their straight-line distance travelled at
    /// `meters_per_second`.
    #[must_use]
    pub fn geometric(meters_per_second: f64) -> Self {
        Self::with_response(StubResponse::Geometric { meters_per_second })
    }

    /// Every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self::with_response(StubResponse::Error("routing unavailable".to_string()))
    }

    /// Sleep before answering each call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every leg that ends at `destination`.
    #[must_use]
    pub fn failing_to(mut self, destination: Coordinates) -> Self {
        self.failing_destinations
            .insert((destination.lat.to_bits(), destination.lng.to_bits()));
        self
    }

    /// Number of `route` calls started.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of `route` calls that ran to completion.
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoutingService for StubRoutingService {
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<Segment> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        if self
            .failing_destinations
            .contains(&(to.lat.to_bits(), to.lng.to_bits()))
        {
            return Err(AppError::RoutingApi(format!(
                "no route to {}",
                to.to_lng_lat()
            )));
        }

        match &self.response {
            StubResponse::Fixed(segment) => Ok(*segment),
            StubResponse::Geometric { meters_per_second } => {
                let distance = haversine_distance(&from, &to);
                Ok(Segment::new(
                    distance,
                    (distance / meters_per_second) as i64,
                ))
            }
            StubResponse::Error(message) => Err(AppError::RoutingApi(message.clone())),
        }
    }
}

/// Stub [`KeywordSearch`] returning the same hits for every query.
#[derive(Debug)]
pub struct StubKeywordSearch {
    results: std::result::Result<Vec<PlaceCandidate>, String>,
    calls: AtomicUsize,
}

impl StubKeywordSearch {
    #[must_use]
    pub fn with_results(results: Vec<PlaceCandidate>) -> Self {
        Self {
            results: Ok(results),
            calls: AtomicUsize::new(0),
        }
    }

    /// A single hit at `location`.
    #[must_use]
    pub fn at(name: &str, location: Coordinates) -> Self {
        Self::with_results(vec![PlaceCandidate {
            place_name: name.to_string(),
            address: format!("{name} address"),
            road_address: None,
            location,
        }])
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::with_results(Vec::new())
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            results: Err("search unavailable".to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeywordSearch for StubKeywordSearch {
    async fn search(&self, _query: &str) -> Result<Vec<PlaceCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results
            .clone()
            .map_err(AppError::GeocodingApi)
    }
}

/// In-memory [`PlaceRepository`].
#[derive(Debug, Default)]
pub struct StubPlaceRepository {
    places: RwLock<Vec<Place>>,
    fail: bool,
}

impl StubPlaceRepository {
    #[must_use]
    pub fn with_places(places: Vec<Place>) -> Self {
        Self {
            places: RwLock::new(places),
            fail: false,
        }
    }

    /// Every operation fails with a storage error.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            places: RwLock::new(Vec::new()),
            fail: true,
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            Err(AppError::Internal("place store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PlaceRepository for StubPlaceRepository {
    async fn list_all(&self) -> Result<Vec<Place>> {
        self.check()?;
        Ok(self.places.read().await.clone())
    }

    async fn insert(&self, place: &Place) -> Result<()> {
        self.check()?;
        let mut places = self.places.write().await;
        if places.iter().any(|p| p.id == place.id) {
            return Err(AppError::InvalidRequest(format!(
                "Place {} already exists",
                place.id
            )));
        }
        places.push(place.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.check()?;
        let mut places = self.places.write().await;
        let before = places.len();
        places.retain(|p| p.id != id);
        Ok(places.len() != before)
    }

    async fn delete_all(&self) -> Result<u64> {
        self.check()?;
        let mut places = self.places.write().await;
        let removed = places.len() as u64;
        places.clear();
        Ok(removed)
    }

    async fn count(&self) -> Result<i64> {
        self.check()?;
        Ok(self.places.read().await.len() as i64)
    }
}

/// Place at `(lat, lng)` with a generated id.
///
/// # Panics
///
/// Panics when the coordinates are out of range.
pub fn place(name: &str, lat: f64, lng: f64) -> Place {
    let location = Coordinates::new(lat, lng)
        .unwrap_or_else(|e| panic!("invalid test coordinates for {name}: {e}"));
    Place::new(name.to_string(), String::new(), location)
}

/// Serve `router` on an ephemeral local port and return its base URL.
///
/// # Panics
///
/// Panics when no local port can be bound.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("failed to bind test listener: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("failed to read test listener address: {e}"));

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("Test server stopped: {}", e);
        }
    });

    format!("http://{}", addr)
}
