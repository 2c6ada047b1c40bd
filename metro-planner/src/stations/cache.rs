//! On-disk copy of the station dataset.
//!
//! The entrances export changes a few times a year, so a run can reuse the
//! records fetched by an earlier run. Only raw dataset records are stored;
//! planning structures are always rebuilt.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::Station;

use super::StationSource;
use super::client::{StationClient, StationDto};
use super::convert::convert_stations;
use super::error::StationError;

/// Records older than this are refetched.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// File contents: the records plus when they were written.
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    written_at: u64,
    records: Vec<StationDto>,
}

impl CacheFile {
    fn age(&self, now: u64) -> Duration {
        Duration::from_secs(now.saturating_sub(self.written_at))
    }
}

/// Seconds since the Unix epoch, or `None` if the clock is before it.
fn unix_now() -> Option<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}

/// Where the cache lives and how long it stays fresh.
#[derive(Debug, Clone)]
pub struct StationCacheConfig {
    pub path: PathBuf,
    pub ttl: Duration,
}

impl StationCacheConfig {
    /// Cache at `path` with a 24 hour TTL.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for StationCacheConfig {
    fn default() -> Self {
        Self::new("metro_stations.json")
    }
}

/// Station records persisted as JSON.
#[derive(Debug, Clone)]
pub struct StationCache {
    config: StationCacheConfig,
}

impl StationCache {
    pub fn new(config: StationCacheConfig) -> Self {
        Self { config }
    }

    /// Records from the cache file, if it exists, parses and is fresh.
    pub fn load(&self) -> Option<Vec<StationDto>> {
        let path = &self.config.path;
        let text = fs::read_to_string(path).ok()?;

        let file: CacheFile = match serde_json::from_str(&text) {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Ignoring unreadable station cache");
                return None;
            }
        };

        let age = file.age(unix_now()?);
        if age >= self.config.ttl {
            debug!(path = %path.display(), age_secs = age.as_secs(), "Station cache is stale");
            return None;
        }

        Some(file.records)
    }

    /// Overwrite the cache file, creating missing parent directories.
    pub fn save(&self, records: &[StationDto]) -> Result<(), StationError> {
        let cache_error = |what: &str, e: &dyn std::fmt::Display| StationError::Cache {
            message: format!("{what}: {e}"),
        };

        let written_at = unix_now().ok_or_else(|| StationError::Cache {
            message: "system clock is before the Unix epoch".to_string(),
        })?;
        let file = CacheFile {
            written_at,
            records: records.to_vec(),
        };

        let path = &self.config.path;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| cache_error("cannot create cache directory", &e))?;
        }

        let json = serde_json::to_string(&file)
            .map_err(|e| cache_error("cannot serialize station cache", &e))?;
        fs::write(path, json).map_err(|e| cache_error("cannot write station cache", &e))
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }
}

/// Station dataset client backed by the disk cache.
///
/// Serves records from the cache file while it is fresh; otherwise fetches
/// from the dataset and rewrites the file.
#[derive(Debug, Clone)]
pub struct CachedStationClient {
    client: StationClient,
    cache: StationCache,
}

impl CachedStationClient {
    /// Create a new cached client.
    pub fn new(client: StationClient, cache: StationCache) -> Self {
        Self { client, cache }
    }

    /// Load dataset records, from the cache if possible.
    pub async fn fetch_all(&self) -> Result<Vec<StationDto>, StationError> {
        if let Some(records) = self.cache.load() {
            debug!(
                path = %self.cache.path().display(),
                records = records.len(),
                "Loaded station records from cache"
            );
            return Ok(records);
        }

        let records = self.client.fetch_all().await?;

        // A cache that cannot be written only costs a refetch next time
        if let Err(e) = self.cache.save(&records) {
            warn!(
                path = %self.cache.path().display(),
                error = %e,
                "Failed to write station cache"
            );
        }

        Ok(records)
    }
}

impl StationSource for CachedStationClient {
    async fn fetch_stations(&self) -> Result<Vec<Station>, StationError> {
        let records = self.fetch_all().await?;
        Ok(convert_stations(&records))
    }
}
