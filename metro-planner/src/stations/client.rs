//! Open-data station dataset client.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Station;

use super::StationSource;
use super::convert::convert_stations;
use super::error::StationError;

/// Default URL of the station entrances export.
const DEFAULT_BASE_URL: &str =
    "https://valencia.opendatasoft.com/api/explore/v2.1/catalog/datasets/fgv-bocas/exports/json";

/// A field the dataset sometimes encodes as a number and sometimes as a string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawField {
    Number(u64),
    Text(String),
}

impl RawField {
    /// Returns the field as text.
    pub fn as_text(&self) -> String {
        match self {
            RawField::Number(n) => n.to_string(),
            RawField::Text(s) => s.clone(),
        }
    }
}

/// Minimal DTO for one station entrance record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationDto {
    pub idparada: RawField,
    pub denominacion: String,
    pub lineas: RawField,
    pub geo_shape: GeoShape,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeoShape {
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Geometry {
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

/// Configuration for the station dataset client.
#[derive(Debug, Clone)]
pub struct StationClientConfig {
    /// URL of the JSON export
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StationClientConfig {
    /// Create a config pointing at the public dataset.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for StationClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the station entrances dataset.
#[derive(Debug, Clone)]
pub struct StationClient {
    http: reqwest::Client,
    base_url: String,
}

impl StationClient {
    /// Create a new dataset client.
    pub fn new(config: StationClientConfig) -> Result<Self, StationError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch every entrance record from the dataset.
    pub async fn fetch_all(&self) -> Result<Vec<StationDto>, StationError> {
        let response = self.http.get(&self.base_url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(StationError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let records: Vec<StationDto> =
            serde_json::from_str(&body).map_err(|e| StationError::Json {
                message: e.to_string(),
            })?;

        debug!(records = records.len(), "Fetched station records");
        Ok(records)
    }
}

impl StationSource for StationClient {
    async fn fetch_stations(&self) -> Result<Vec<Station>, StationError> {
        let records = self.fetch_all().await?;
        Ok(convert_stations(&records))
    }
}
