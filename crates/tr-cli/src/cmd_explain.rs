use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};

use tr_config::TrendsConfig;
use tr_core::{QueryParams, TrendsRequest};
use tr_runtime::{FixtureEngine, TrendsService};

/// CLI entry point: compile the request and print the explanation.
pub fn run(
    config: &TrendsConfig,
    trend_function: Option<String>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    field: Vec<String>,
    query: Option<String>,
) -> Result<()> {
    let mut request = TrendsRequest::new(QueryParams {
        start,
        end,
        project_ids: Vec::new(),
        environments: Vec::new(),
    })
    .with_fields(field);
    request.trend_function = trend_function;
    request.query = query;

    // Explaining never reaches the engine.
    let service = TrendsService::new(config, Arc::new(FixtureEngine::default()));
    let explanation = service
        .explain(&request)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    print!("{explanation}");
    Ok(())
}
