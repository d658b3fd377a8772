use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tr_config::HumanDuration;

use crate::request::QueryParams;

/// One result row, keyed by column alias.
pub type Row = serde_json::Map<String, Value>;

/// Rows returned by the primary query, plus the engine's column types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventResultSet {
    pub data: Vec<Row>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl EventResultSet {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Primary ranked-events query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsQuery {
    /// Caller columns followed by the compiled trend expressions.
    pub selected_columns: Vec<String>,
    pub query: String,
    pub params: QueryParams,
    pub orderby: Vec<String>,
    pub offset: usize,
    pub limit: usize,
    pub referrer: String,
}

/// Identity of one ranked event: its pass-through column values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupKey {
    /// Values joined with `,`; also the key of the returned series map.
    pub key: String,
    pub values: Row,
}

/// Secondary time-series query scoped to the top-ranked events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesQuery {
    /// Aggregates to chart, i.e. the trend function itself.
    pub query_columns: Vec<String>,
    pub selected_columns: Vec<String>,
    pub query: String,
    pub params: QueryParams,
    pub orderby: Vec<String>,
    pub rollup: HumanDuration,
    pub limit: usize,
    pub top_events: Vec<GroupKey>,
    pub referrer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Bucket start, unix seconds.
    pub time: i64,
    pub value: Option<f64>,
}

/// Bucketed series for one ranked event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Rank of the event in the primary result.
    pub order: usize,
    pub start: i64,
    pub end: i64,
    pub data: Vec<SeriesPoint>,
}

/// Boundary to the columnar query engine.
///
/// Errors are opaque to this crate; they are forwarded as
/// `CoreReason::UpstreamQuery` without retry.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn query(&self, request: &EventsQuery) -> anyhow::Result<EventResultSet>;

    async fn top_events_timeseries(
        &self,
        request: &TimeseriesQuery,
    ) -> anyhow::Result<BTreeMap<String, TimeSeries>>;
}
