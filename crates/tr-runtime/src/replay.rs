use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use orion_error::compat_prelude::*;
use orion_error::op_context;
use orion_error::prelude::*;
use serde::Serialize;

use tr_config::TrendsConfig;
use tr_core::{TrendsOutcome, TrendsRequest};

use crate::error::{RuntimeReason, RuntimeResult};
use crate::fixture::{EngineCall, Fixture, FixtureEngine};
use crate::service::{Mode, TrendsService};

/// Response of a replayed request together with the engine traffic it caused.
#[derive(Debug, Serialize)]
pub struct ReplayOutput {
    pub response: TrendsOutcome,
    pub calls: Vec<EngineCall>,
}

/// Read a JSON-encoded [`TrendsRequest`].
pub fn load_request(path: &Path) -> RuntimeResult<TrendsRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request {}", path.display()))
        .owe(RuntimeReason::Bootstrap)?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid request {}", path.display()))
        .owe(RuntimeReason::Bootstrap)
}

/// Run a recorded request against a fixture engine.
pub async fn replay(
    config: &TrendsConfig,
    request: &Path,
    fixture: &Path,
    mode: Mode,
) -> RuntimeResult<ReplayOutput> {
    let mut op = op_context!("trends-replay").with_auto_log();
    op.record("request", request.display().to_string().as_str());
    op.record("fixture", fixture.display().to_string().as_str());

    let request = load_request(request)?;
    let engine = Arc::new(FixtureEngine::new(Fixture::load(fixture)?));
    let service = TrendsService::new(config, engine.clone());

    let response = service.handle(mode, &request).await?;
    let calls = engine.calls();
    tr_info!(sys, mode = %mode, engine_calls = calls.len(), "replay complete");

    op.mark_suc();
    Ok(ReplayOutput { response, calls })
}
