//! Station source: the list of stations a planning run works from.
//!
//! Stations are loaded from the open-data entrances dataset, optionally via
//! an on-disk cache. Any type implementing [`StationSource`] can feed the
//! planner; a plain `Vec<Station>` serves static data.

mod cache;
mod client;
mod convert;
mod error;

pub use cache::{CachedStationClient, StationCache, StationCacheConfig};
pub use client::{GeoShape, Geometry, RawField, StationClient, StationClientConfig, StationDto};
pub use convert::convert_stations;
pub use error::StationError;

use crate::domain::Station;

/// Trait for loading the current station list.
///
/// This abstraction allows the planner to be tested with static data.
#[allow(async_fn_in_trait)]
pub trait StationSource {
    /// Fetch every station. Failures are surfaced to the caller unretried.
    async fn fetch_stations(&self) -> Result<Vec<Station>, StationError>;
}

impl StationSource for Vec<Station> {
    async fn fetch_stations(&self) -> Result<Vec<Station>, StationError> {
        Ok(self.clone())
    }
}
