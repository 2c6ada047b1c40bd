//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from upstream/IO errors and from planning outcomes.

use super::StationId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Station identifier is not a non-negative integer
    #[error("invalid station id: {0:?}")]
    InvalidStationId(String),

    /// Line identifier is not a small positive integer
    #[error("invalid line: {0:?}")]
    InvalidLine(String),

    /// Latitude/longitude out of range or not finite
    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// Station constructed without any location
    #[error("station {0} has no entrances")]
    NoEntrances(StationId),

    /// Itinerary has no steps
    #[error("itinerary must have at least one step")]
    EmptyItinerary,

    /// Itinerary steps are malformed
    #[error("invalid itinerary: {0}")]
    InvalidItinerary(&'static str),
}
