//! Configuration for a planning run.

/// Configuration parameters for building the station graph.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// Restrict adjacency to lines the live board reports as running.
    /// Costs one live query per station.
    pub use_live_service: bool,

    /// Fail the whole plan when any live query fails.
    /// When unset, a failed station is treated as having no live lines.
    pub strict_live: bool,

    /// Maximum number of live queries issued concurrently.
    pub batch_size: usize,
}

impl PlanConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(use_live_service: bool, strict_live: bool, batch_size: usize) -> Self {
        Self {
            use_live_service,
            strict_live,
            batch_size,
        }
    }

    /// Enable or disable live-service filtering.
    pub fn with_live_service(mut self, enabled: bool) -> Self {
        self.use_live_service = enabled;
        self
    }

    /// Enable or disable all-or-nothing live queries.
    pub fn with_strict_live(mut self, strict: bool) -> Self {
        self.strict_live = strict;
        self
    }

    /// Set the live query batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            use_live_service: false,
            strict_live: false,
            batch_size: 8,
        }
    }
}
