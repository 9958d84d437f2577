use crate::error::{AppError, Result};
use crate::models::{Coordinates, PlaceCandidate};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Free-text place lookup, most relevant hit first.
#[async_trait]
pub trait KeywordSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>>;
}

/// Client for the Kakao Local keyword search API.
#[derive(Clone)]
pub struct KakaoLocalClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl KakaoLocalClient {
    pub fn with_base_url(api_key: String, base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(KakaoLocalClient {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl KeywordSearch for KakaoLocalClient {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>> {
        let url = format!("{}/v2/local/search/keyword.json", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("KakaoAK {}", self.api_key))
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|e| AppError::GeocodingApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::GeocodingApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: KakaoKeywordResponse = response
            .json()
            .await
            .map_err(|e| AppError::GeocodingApi(format!("Failed to parse response: {}", e)))?;

        let candidates: Vec<PlaceCandidate> = body
            .documents
            .into_iter()
            .filter_map(KakaoDocument::into_candidate)
            .collect();

        tracing::debug!(
            query = %query,
            results = candidates.len(),
            "Keyword search returned {} candidates",
            candidates.len()
        );

        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct KakaoKeywordResponse {
    #[serde(default)]
    documents: Vec<KakaoDocument>,
}

#[derive(Debug, Deserialize)]
struct KakaoDocument {
    place_name: String,
    #[serde(default)]
    address_name: String,
    #[serde(default)]
    road_address_name: Option<String>,
    /// Longitude, as a decimal string
    x: String,
    /// Latitude, as a decimal string
    y: String,
}

impl KakaoDocument {
    fn into_candidate(self) -> Option<PlaceCandidate> {
        let location = self
            .y
            .trim()
            .parse::<f64>()
            .ok()
            .zip(self.x.trim().parse::<f64>().ok())
            .and_then(|(lat, lng)| Coordinates::new(lat, lng).ok());

        let Some(location) = location else {
            tracing::warn!(
                "Skipping search result '{}' with invalid position ({}, {})",
                self.place_name,
                self.x,
                self.y
            );
            return None;
        };

        Some(PlaceCandidate {
            place_name: self.place_name,
            address: self.address_name,
            road_address: self.road_address_name.filter(|road| !road.is_empty()),
            location,
        })
    }
}
