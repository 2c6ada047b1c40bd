//! Planning error types.

use crate::domain::StationId;
use crate::live::LiveError;
use crate::stations::StationError;

/// Error from a planning request.
///
/// `NoRouteFound` is a legitimate outcome; `Internal` means a planner
/// invariant was broken and is never retried.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A collaborator could not be reached
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] UpstreamError),

    /// Station id not present in the loaded station set
    #[error("unknown station {0}")]
    UnknownStation(StationId),

    /// Destination unreachable from origin under the current graph
    #[error("no route from station {origin} to station {destination}")]
    NoRouteFound {
        origin: StationId,
        destination: StationId,
    },

    /// Coordinates cannot be resolved against an empty station list
    #[error("no stations loaded")]
    NoStations,

    /// Broken planner invariant
    #[error("internal planner error: {0}")]
    Internal(String),
}

/// Which collaborator failed, and why.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("station source: {0}")]
    Stations(#[from] StationError),

    #[error("live service for station {station}: {source}")]
    Live {
        station: StationId,
        #[source]
        source: LiveError,
    },
}

impl From<StationError> for PlanError {
    fn from(err: StationError) -> Self {
        PlanError::UpstreamUnavailable(UpstreamError::Stations(err))
    }
}
