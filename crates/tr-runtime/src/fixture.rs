use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use anyhow::Context;
use async_trait::async_trait;
use orion_error::compat_prelude::*;
use orion_error::prelude::*;
use serde::{Deserialize, Serialize};

use tr_core::{EventResultSet, EventsQuery, QueryEngine, TimeSeries, TimeseriesQuery};

use crate::error::{RuntimeReason, RuntimeResult};

/// Engine call that a fixture can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailStage {
    Events,
    Timeseries,
}

/// Canned engine responses, usually read from a JSON file:
///
/// ```json
/// {
///   "events": { "data": [{"transaction": "/api", "t_score": 4.2}], "meta": {} },
///   "series": { "/api": { "order": 0, "start": 0, "end": 3600, "data": [] } },
///   "fail": "timeseries"
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Fixture {
    /// Full ranked result; offset and limit are applied per query.
    pub events: EventResultSet,
    /// Series by group key; only requested keys are returned.
    pub series: BTreeMap<String, TimeSeries>,
    pub fail: Option<FailStage>,
}

impl Fixture {
    pub fn load(path: &Path) -> RuntimeResult<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))
            .owe(RuntimeReason::Bootstrap)?;
        let fixture: Fixture = serde_json::from_str(&content)
            .with_context(|| format!("invalid fixture {}", path.display()))
            .owe(RuntimeReason::Bootstrap)?;
        tr_debug!(
            conf,
            rows = fixture.events.len(),
            series = fixture.series.len(),
            "fixture loaded"
        );
        Ok(fixture)
    }
}

/// One recorded engine request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineCall {
    Events(EventsQuery),
    Timeseries(TimeseriesQuery),
}

/// In-memory [`QueryEngine`] that answers from a [`Fixture`] and records
/// every request it receives.
#[derive(Debug, Default)]
pub struct FixtureEngine {
    fixture: Fixture,
    calls: Mutex<Vec<EngineCall>>,
}

impl FixtureEngine {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: EngineCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

#[async_trait]
impl QueryEngine for FixtureEngine {
    async fn query(&self, request: &EventsQuery) -> anyhow::Result<EventResultSet> {
        self.record(EngineCall::Events(request.clone()));
        if self.fixture.fail == Some(FailStage::Events) {
            anyhow::bail!("fixture engine: events query failed");
        }
        let data = self
            .fixture
            .events
            .data
            .iter()
            .skip(request.offset)
            .take(request.limit)
            .cloned()
            .collect();
        Ok(EventResultSet {
            data,
            meta: self.fixture.events.meta.clone(),
        })
    }

    async fn top_events_timeseries(
        &self,
        request: &TimeseriesQuery,
    ) -> anyhow::Result<BTreeMap<String, TimeSeries>> {
        self.record(EngineCall::Timeseries(request.clone()));
        if self.fixture.fail == Some(FailStage::Timeseries) {
            anyhow::bail!("fixture engine: timeseries query failed");
        }
        Ok(request
            .top_events
            .iter()
            .filter_map(|k| {
                self.fixture
                    .series
                    .get(&k.key)
                    .map(|s| (k.key.clone(), s.clone()))
            })
            .collect())
    }
}
