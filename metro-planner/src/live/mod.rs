//! Live-service collaborator: which lines are running through a station now.
//!
//! Key characteristics of the live board:
//! - One page per station, listing upcoming trains with their line,
//!   destination and scheduled clock time
//! - Times are local wall-clock `HH:MM:SS`; a time earlier than now means
//!   tomorrow
//! - Querying it is the dominant cost of a live-filtered plan (one request
//!   per station)

mod board;
mod client;
mod error;
mod mock;

pub use board::{Arrival, lines_of, parse_board};
pub use client::{ArrivalsClient, ArrivalsClientConfig};
pub use error::LiveError;
pub use mock::StaticLiveService;

use std::collections::BTreeSet;

use crate::domain::{LineId, StationId};

/// Trait for querying the lines currently serving a station.
#[allow(async_fn_in_trait)]
pub trait LiveService {
    /// Lines with a train currently due at `station`.
    async fn live_lines(&self, station: StationId) -> Result<BTreeSet<LineId>, LiveError>;
}
