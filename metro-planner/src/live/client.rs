//! Live departures board HTTP client.
//!
//! Fetches the board page for a station and extracts its upcoming arrivals.
//! A semaphore bounds the number of requests in flight so that planning
//! with live service, which queries every station, does not flood the
//! board service.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{LineId, StationId};

use super::LiveService;
use super::board::{Arrival, lines_of, parse_board};
use super::error::LiveError;

/// Default URL of the live departures board.
const DEFAULT_BASE_URL: &str =
    "https://geoportal.valencia.es/geoportal-services/api/v1/salidas-metro.html";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the live board client.
#[derive(Debug, Clone)]
pub struct ArrivalsClientConfig {
    /// URL of the board page; the station is passed as `?estacion=`
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ArrivalsClientConfig {
    /// Create a config pointing at the public board.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ArrivalsClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Live departures board client.
#[derive(Debug, Clone)]
pub struct ArrivalsClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl ArrivalsClient {
    /// Create a new board client with the given configuration.
    pub fn new(config: ArrivalsClientConfig) -> Result<Self, LiveError> {
        if config.max_concurrent == 0 {
            return Err(LiveError::NotConfigured(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Get the upcoming arrivals at a station, timed from the local clock.
    pub async fn get_arrivals(&self, station: StationId) -> Result<Vec<Arrival>, LiveError> {
        let html = self.get_board_raw(station).await?;
        let arrivals = parse_board(&html, Local::now().time());

        debug!(station = %station, arrivals = arrivals.len(), "Fetched live board");
        Ok(arrivals)
    }

    /// Get the raw board page (for debugging/testing).
    pub async fn get_board_raw(&self, station: StationId) -> Result<String, LiveError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| LiveError::NotConfigured("semaphore closed".to_string()))?;

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("estacion", station.0.to_string())])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LiveError::StationNotFound(station));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LiveError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LiveError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

impl LiveService for ArrivalsClient {
    async fn live_lines(&self, station: StationId) -> Result<BTreeSet<LineId>, LiveError> {
        let arrivals = self.get_arrivals(station).await?;
        Ok(lines_of(&arrivals))
    }
}
