use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::logging::LoggingConfig;
use crate::query::QueryConfig;
use crate::stats::StatsConfig;
use crate::validate;

// ---------------------------------------------------------------------------
// TrendsConfig
// ---------------------------------------------------------------------------

/// Resolved, validated contents of `trends.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrendsConfig {
    pub query: QueryConfig,
    pub stats: StatsConfig,
    pub logging: LoggingConfig,
}

impl TrendsConfig {
    /// Read and parse a `trends.toml` file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.as_ref().display()))?;
        content.parse()
    }
}

impl FromStr for TrendsConfig {
    type Err = anyhow::Error;

    /// Parse a TOML string into a validated [`TrendsConfig`].
    fn from_str(toml_str: &str) -> anyhow::Result<Self> {
        let config: TrendsConfig = toml::from_str(toml_str)?;
        validate::validate(&config)?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
