use crate::stats::MAX_TOP_EVENTS;
use crate::trends::TrendsConfig;

/// Internal validation, called automatically during `TrendsConfig::from_str` / `load`.
pub(crate) fn validate(config: &TrendsConfig) -> anyhow::Result<()> {
    // query.default_trend_function must resolve through the registry
    tr_lang::parse_trend_function(&config.query.default_trend_function)
        .map_err(|e| anyhow::anyhow!("query.default_trend_function: {e}"))?;

    // stats.max_points > 0
    if config.stats.max_points == 0 {
        anyhow::bail!("stats.max_points must be > 0");
    }

    // 1 <= stats.top_events <= MAX_TOP_EVENTS
    if config.stats.top_events == 0 || config.stats.top_events > MAX_TOP_EVENTS {
        anyhow::bail!(
            "stats.top_events must be within 1..={MAX_TOP_EVENTS}, got {}",
            config.stats.top_events,
        );
    }

    if config.logging.level.trim().is_empty() {
        anyhow::bail!("logging.level must not be empty");
    }

    Ok(())
}
