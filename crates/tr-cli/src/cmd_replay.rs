use std::path::Path;

use anyhow::Result;

use tr_config::TrendsConfig;
use tr_runtime::{Mode, replay};

/// CLI entry point: replay the request and print the JSON response.
pub async fn run(
    config: &TrendsConfig,
    request: &Path,
    fixture: &Path,
    mode: Mode,
    show_calls: bool,
) -> Result<()> {
    let output = replay(config, request, fixture, mode)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!("{}", serde_json::to_string_pretty(&output.response)?);
    if show_calls {
        eprintln!("---");
        for call in &output.calls {
            eprintln!("{}", serde_json::to_string(call)?);
        }
    }
    tracing::debug!(domain = "sys", calls = output.calls.len(), "replay printed");
    Ok(())
}
