//! Latest station observation via api.weather.gov

use crate::shared::PollError;
use async_trait::async_trait;
use serde::Deserialize;

// === API Response Structs ===

/// GeoJSON feature returned by `/stations/{id}/observations/latest`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservationResponse {
    #[serde(default)]
    pub properties: Option<ObservationProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationProperties {
    #[serde(default)]
    pub wind_speed: Option<Measurement>,
    #[serde(default)]
    pub wind_direction: Option<Measurement>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A quantitative value as the API reports it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit_code: Option<String>,
}

impl ObservationProperties {
    /// Wind speed in meters per second. `unitCode` is not consulted.
    pub fn wind_speed_mps(&self) -> Option<f64> {
        self.wind_speed.as_ref()?.value
    }

    /// Wind direction in degrees from north, as reported
    pub fn wind_direction_deg(&self) -> Option<f64> {
        self.wind_direction.as_ref()?.value
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }
}

// === HTTP Capability ===

/// Minimal HTTP GET used by the poller.
///
/// Implementations map a non-success status to [`PollError::Http`] and any
/// transport failure to [`PollError::Network`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, PollError>;
}

#[async_trait]
impl HttpClient for reqwest::Client {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, PollError> {
        let mut request = reqwest::Client::get(self, url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PollError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| PollError::Network(e.to_string()))
    }
}

// === Helper Functions ===

pub fn latest_observation_url(api_base: &str, station: &str) -> String {
    format!(
        "{}/stations/{}/observations/latest",
        api_base.trim_end_matches('/'),
        urlencoding::encode(station)
    )
}

pub fn parse_observation(body: &str) -> Result<ObservationResponse, PollError> {
    serde_json::from_str(body).map_err(|e| PollError::Parse(e.to_string()))
}

/// Fetch and parse the latest observation for `station`.
pub async fn fetch_latest(
    client: &dyn HttpClient,
    api_base: &str,
    station: &str,
    user_agent: &str,
) -> Result<ObservationResponse, PollError> {
    let url = latest_observation_url(api_base, station);
    tracing::debug!("GET {}", url);

    let headers = [("Accept", "application/geo+json"), ("User-Agent", user_agent)];
    let body = client.get(&url, &headers).await?;
    parse_observation(&body)
}
