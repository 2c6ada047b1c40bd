//! Live-service client error types.

use std::fmt;

use crate::domain::StationId;

/// Errors from the live departures board client.
#[derive(Debug)]
pub enum LiveError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// Board returned an error status code
    ApiError { status: u16, message: String },

    /// No board exists for this station
    StationNotFound(StationId),

    /// Rate limited by the board service
    RateLimited,

    /// Client is shutting down or misconfigured
    NotConfigured(String),
}

impl fmt::Display for LiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveError::Http(e) => write!(f, "HTTP error: {e}"),
            LiveError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            LiveError::StationNotFound(id) => write!(f, "no live board for station {id}"),
            LiveError::RateLimited => write!(f, "rate limited by live board service"),
            LiveError::NotConfigured(msg) => write!(f, "not configured: {msg}"),
        }
    }
}

impl std::error::Error for LiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LiveError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LiveError {
    fn from(err: reqwest::Error) -> Self {
        LiveError::Http(err)
    }
}
