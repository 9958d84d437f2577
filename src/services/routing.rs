use crate::config::DurationUnit;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, Segment};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Road distance/duration between two points.
///
/// Implementations may fail or hang; callers bound each call with a timeout
/// and treat any error as "segment unavailable".
#[async_trait]
pub trait RoutingService: Send + Sync {
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<Segment>;
}

/// Client for the Kakao Mobility directions API.
#[derive(Clone)]
pub struct KakaoNaviClient {
    client: Client,
    api_key: String,
    base_url: String,
    duration_unit: DurationUnit,
}

impl KakaoNaviClient {
    pub fn with_config(
        api_key: String,
        base_url: String,
        duration_unit: DurationUnit,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(KakaoNaviClient {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            duration_unit,
        })
    }
}

#[async_trait]
impl RoutingService for KakaoNaviClient {
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<Segment> {
        let url = format!("{}/v1/directions", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("KakaoAK {}", self.api_key))
            .query(&[
                ("origin", from.to_lng_lat()),
                ("destination", to.to_lng_lat()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::RoutingApi(format!("Request timed out: {}", e))
                } else {
                    AppError::RoutingApi(format!("Request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::RoutingApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let directions: KakaoDirectionsResponse = response
            .json()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Failed to parse response: {}", e)))?;

        let route = directions
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| AppError::RoutingApi("No routes in response".to_string()))?;

        let summary = route.summary.ok_or_else(|| {
            AppError::RoutingApi(format!(
                "Route without summary (code {:?}: {})",
                route.result_code,
                route.result_msg.as_deref().unwrap_or("no message")
            ))
        })?;

        let segment = Segment::new(
            summary.distance,
            self.duration_unit.to_seconds(summary.duration as i64),
        );

        tracing::debug!(
            distance_m = segment.distance_meters,
            duration_s = segment.duration_seconds,
            "Directions response: {:.0}m, {}s",
            segment.distance_meters,
            segment.duration_seconds
        );

        Ok(segment)
    }
}

// Kakao directions response types

#[derive(Debug, Deserialize)]
struct KakaoDirectionsResponse {
    #[serde(default)]
    routes: Vec<KakaoRoute>,
}

#[derive(Debug, Deserialize)]
struct KakaoRoute {
    #[serde(default)]
    result_code: Option<i64>,
    #[serde(default)]
    result_msg: Option<String>,
    #[serde(default)]
    summary: Option<KakaoSummary>,
}

#[derive(Debug, Deserialize)]
struct KakaoSummary {
    distance: f64, // meters
    duration: f64, // see DurationUnit
}
