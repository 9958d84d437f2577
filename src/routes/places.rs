use crate::error::{AppError, Result};
use crate::models::{Coordinates, NewPlaceRequest, Place, PlaceCandidate};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SearchQueryParams {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<PlaceCandidate>,
}

#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    pub removed: u64,
}

/// GET /places
/// List saved places in the order they were saved
pub async fn list_places(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Place>>> {
    let places = state.place_repo.list_all().await?;
    Ok(Json(places))
}

/// POST /places
pub async fn create_place(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewPlaceRequest>,
) -> Result<(StatusCode, Json<Place>)> {
    request.validate().map_err(AppError::InvalidRequest)?;

    let place = request.into_place();
    state.place_repo.insert(&place).await?;

    tracing::info!(id = %place.id, name = %place.display_name, "Place saved");
    Ok((StatusCode::CREATED, Json(place)))
}

/// POST /places/from-search
/// Save a hit returned by `GET /places/search`
pub async fn save_search_result(
    State(state): State<Arc<AppState>>,
    Json(candidate): Json<PlaceCandidate>,
) -> Result<(StatusCode, Json<Place>)> {
    if candidate.place_name.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "place_name must not be empty".to_string(),
        ));
    }
    Coordinates::new(candidate.location.lat, candidate.location.lng)
        .map_err(AppError::InvalidRequest)?;

    let place = candidate.into_place();
    state.place_repo.insert(&place).await?;

    tracing::info!(id = %place.id, name = %place.display_name, "Search result saved");
    Ok((StatusCode::CREATED, Json(place)))
}

/// DELETE /places/{id}
pub async fn delete_place(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if state.place_repo.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Place {} not found", id)))
    }
}

/// DELETE /places
pub async fn delete_all_places(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeleteAllResponse>> {
    let removed = state.place_repo.delete_all().await?;
    Ok(Json(DeleteAllResponse { removed }))
}

/// GET /places/search?query=
/// Keyword search for places to save
pub async fn search_places(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQueryParams>,
) -> Result<Json<SearchResponse>> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidRequest("query must not be empty".to_string()));
    }

    let results = state.keyword_search.search(query).await?;
    Ok(Json(SearchResponse { results }))
}
