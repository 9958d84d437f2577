use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Routing API error: {0}")]
    RoutingApi(String),

    #[error("Keyword search API error: {0}")]
    GeocodingApi(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Origin not found: {0}")]
    OriginNotFound(String),

    #[error("No saved places to route through")]
    EmptyCandidateSet,

    #[error("No route could be computed: {0}")]
    NoRouteComputed(String),

    #[error("Route space too large: {0}")]
    RouteSpaceTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal database error".to_string())
            }
            AppError::RoutingApi(ref e) => {
                tracing::error!("Routing API error: {}", e);
                (StatusCode::BAD_GATEWAY, "Routing service error".to_string())
            }
            AppError::GeocodingApi(ref e) => {
                tracing::error!("Keyword search API error: {}", e);
                (StatusCode::BAD_GATEWAY, "Place search service error".to_string())
            }
            AppError::Cache(ref e) => {
                tracing::warn!("Cache error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Cache error".to_string())
            }
            AppError::InvalidRequest(e) => (StatusCode::BAD_REQUEST, e),
            AppError::OriginNotFound(ref query) => {
                tracing::info!("Origin not found for query '{}'", query);
                (
                    StatusCode::NOT_FOUND,
                    format!("Start location '{}' could not be found", query),
                )
            }
            AppError::EmptyCandidateSet => {
                tracing::info!("Planning request with no saved places");
                (
                    StatusCode::NOT_FOUND,
                    "There are no saved places to route through".to_string(),
                )
            }
            AppError::NoRouteComputed(e) => {
                tracing::warn!("No route computed: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, e)
            }
            AppError::RouteSpaceTooLarge(e) => {
                tracing::warn!("Route space too large: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, e)
            }
            AppError::NotFound(e) => (StatusCode::NOT_FOUND, e),
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
