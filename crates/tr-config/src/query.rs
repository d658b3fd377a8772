use serde::Deserialize;

/// `[query]` section: defaults and referrer tags for the primary query.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Trend function used when the request omits `trendFunction`.
    pub default_trend_function: String,
    /// Referrer attached to the ranked events query.
    pub events_referrer: String,
    /// Referrer attached to the top-N time-series query.
    pub stats_referrer: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_trend_function: "p50()".to_string(),
            events_referrer: "api.trends.get-percentage-change".to_string(),
            stats_referrer: "api.trends.get-event-stats".to_string(),
        }
    }
}
