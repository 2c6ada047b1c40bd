//! In-memory live service for testing without board access.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::{LineId, StationId};

use super::LiveService;
use super::error::LiveError;

/// Live service that serves a fixed station → lines mapping.
///
/// Stations without an entry report no live lines. Stations marked as
/// failing return an error, simulating an unreachable board.
#[derive(Debug, Default)]
pub struct StaticLiveService {
    lines: HashMap<StationId, BTreeSet<LineId>>,
    failing: HashSet<StationId>,
    calls: AtomicUsize,
}

impl StaticLiveService {
    /// Create a service with no live lines anywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lines currently running through a station.
    pub fn with_lines(
        mut self,
        station: StationId,
        lines: impl IntoIterator<Item = LineId>,
    ) -> Self {
        self.lines.insert(station, lines.into_iter().collect());
        self
    }

    /// Make queries for a station fail.
    pub fn failing(mut self, station: StationId) -> Self {
        self.failing.insert(station);
        self
    }

    /// Number of queries answered so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LiveService for StaticLiveService {
    async fn live_lines(&self, station: StationId) -> Result<BTreeSet<LineId>, LiveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(&station) {
            return Err(LiveError::ApiError {
                status: 503,
                message: format!("board for station {station} unavailable"),
            });
        }

        Ok(self.lines.get(&station).cloned().unwrap_or_default())
    }
}
