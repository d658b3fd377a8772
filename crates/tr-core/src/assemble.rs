use std::collections::BTreeMap;

use async_trait::async_trait;
use orion_error::compat_prelude::*;
use orion_error::prelude::*;
use serde::Serialize;
use serde_json::Value;

use tr_config::{QueryConfig, StatsConfig};

use crate::engine::{EventResultSet, GroupKey, QueryEngine, Row, TimeSeries, TimeseriesQuery};
use crate::error::{CoreReason, CoreResult};
use crate::meta::{EventsPayload, with_meta};
use crate::pipeline::PreparedTrend;

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendStatsResponse {
    pub events: EventsPayload,
    pub stats: BTreeMap<String, TimeSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TrendsResponse {
    Events(EventsPayload),
    WithStats(TrendStatsResponse),
}

// ---------------------------------------------------------------------------
// ResultHandler: second pipeline step
// ---------------------------------------------------------------------------

/// Turns a page of ranked events into the response payload.
#[async_trait]
pub trait ResultHandler: Send + Sync {
    /// Whether the pipeline must resolve a stats rollup before querying.
    fn needs_rollup(&self) -> bool {
        false
    }

    async fn on_results(
        &self,
        engine: &dyn QueryEngine,
        prepared: &PreparedTrend,
        events: EventResultSet,
    ) -> CoreResult<TrendsResponse>;
}

/// Ranked events with metadata only; never touches the engine again.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainResults;

#[async_trait]
impl ResultHandler for PlainResults {
    async fn on_results(
        &self,
        _engine: &dyn QueryEngine,
        _prepared: &PreparedTrend,
        events: EventResultSet,
    ) -> CoreResult<TrendsResponse> {
        Ok(TrendsResponse::Events(with_meta(events)))
    }
}

/// Ranked events plus a time series for each of the top-ranked ones.
#[derive(Debug, Clone)]
pub struct StatsResults {
    top_events: usize,
    referrer: String,
}

impl StatsResults {
    pub fn new(stats: &StatsConfig, query: &QueryConfig) -> Self {
        Self {
            top_events: stats.top_events,
            referrer: query.stats_referrer.clone(),
        }
    }
}

impl Default for StatsResults {
    fn default() -> Self {
        Self::new(&StatsConfig::default(), &QueryConfig::default())
    }
}

#[async_trait]
impl ResultHandler for StatsResults {
    fn needs_rollup(&self) -> bool {
        true
    }

    async fn on_results(
        &self,
        engine: &dyn QueryEngine,
        prepared: &PreparedTrend,
        events: EventResultSet,
    ) -> CoreResult<TrendsResponse> {
        if events.is_empty() {
            tr_debug!(stats, "no ranked events, skipping series fetch");
            return Ok(TrendsResponse::WithStats(TrendStatsResponse {
                events: with_meta(events),
                stats: BTreeMap::new(),
            }));
        }

        let rollup = prepared.rollup.ok_or_else(|| {
            StructError::from(CoreReason::Registry)
                .with_detail("stats rollup was not resolved".to_string())
        })?;
        let selected = &prepared.compiled.selected_columns;
        let limit = self.top_events.min(events.len());
        let top_events: Vec<GroupKey> = events.data[..limit]
            .iter()
            .enumerate()
            .map(|(rank, row)| group_key(rank, row, selected))
            .collect();

        let request = TimeseriesQuery {
            query_columns: vec![prepared.compiled.call.raw.clone()],
            selected_columns: selected.clone(),
            query: prepared.query.clone(),
            params: prepared.params.clone(),
            orderby: prepared.orderby.clone(),
            rollup,
            limit,
            top_events,
            referrer: self.referrer.clone(),
        };
        tr_debug!(stats, keys = limit, rollup = %rollup, "fetching top-event series");

        let stats = engine
            .top_events_timeseries(&request)
            .await
            .owe(CoreReason::UpstreamQuery)?;

        Ok(TrendsResponse::WithStats(TrendStatsResponse {
            events: with_meta(events),
            stats,
        }))
    }
}

/// Key a ranked row by its pass-through column values. Without pass-through
/// columns the rank itself is the key.
pub(crate) fn group_key(rank: usize, row: &Row, selected: &[String]) -> GroupKey {
    let present: Vec<(&String, &Value)> = selected
        .iter()
        .filter_map(|col| row.get(col).map(|v| (col, v)))
        .collect();
    let key = if present.is_empty() {
        rank.to_string()
    } else {
        present
            .iter()
            .map(|(_, v)| value_text(v))
            .collect::<Vec<_>>()
            .join(",")
    };
    let values = present
        .into_iter()
        .map(|(col, v)| (col.clone(), v.clone()))
        .collect();
    GroupKey { key, values }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
