use serde::Deserialize;

/// Hard ceiling on top-N enrichment; also the page size.
pub const MAX_TOP_EVENTS: usize = 5;

/// `[stats]` section: limits for the secondary time-series fetch.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Maximum number of buckets a single series may span.
    pub max_points: u64,
    /// How many ranked events get a time series. At most [`MAX_TOP_EVENTS`].
    pub top_events: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            max_points: 10_000,
            top_events: MAX_TOP_EVENTS,
        }
    }
}
