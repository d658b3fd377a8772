use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tr_config::HumanDuration;

use crate::error::{CoreResult, invalid_request};

/// Scoping parameters resolved upstream from the incoming request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, rename = "project")]
    pub project_ids: Vec<u64>,
    #[serde(default, rename = "environment")]
    pub environments: Vec<String>,
}

impl QueryParams {
    pub fn has_projects(&self) -> bool {
        !self.project_ids.is_empty()
    }
}

/// Caller-facing trends request, already decoded from the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsRequest {
    /// `name(args...)`; the configured default applies when absent.
    #[serde(default)]
    pub trend_function: Option<String>,
    /// Pass-through output columns.
    #[serde(default)]
    pub field: Vec<String>,
    /// Filter expression; may embed `t_score()` / `degrees_of_freedom()`.
    #[serde(default)]
    pub query: Option<String>,
    /// Ordering terms, `-` prefix for descending.
    #[serde(default)]
    pub sort: Vec<String>,
    /// Explicit stats rollup; derived from the range when absent.
    #[serde(default)]
    pub interval: Option<HumanDuration>,
    #[serde(default)]
    pub per_page: Option<usize>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(flatten)]
    pub params: QueryParams,
}

impl TrendsRequest {
    pub fn new(params: QueryParams) -> Self {
        Self {
            trend_function: None,
            field: Vec::new(),
            query: None,
            sort: Vec::new(),
            interval: None,
            per_page: None,
            cursor: None,
            params,
        }
    }

    pub fn with_trend_function(mut self, trend_function: impl Into<String>) -> Self {
        self.trend_function = Some(trend_function.into());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Non-empty ordering terms.
    pub fn orderby(&self) -> Vec<String> {
        self.sort
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Sanity checks on what the upstream parser handed over.
    pub fn validate(&self) -> CoreResult<()> {
        if self.params.start > self.params.end {
            return Err(invalid_request(format!(
                "start {} is after end {}",
                self.params.start, self.params.end
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreReason;

    #[test]
    fn decode_from_json() {
        let req: TrendsRequest = serde_json::from_value(serde_json::json!({
            "trendFunction": "p95()",
            "field": ["transaction", "project"],
            "query": "t_score() > 2",
            "sort": ["-trend_percentage()", " "],
            "interval": "1h",
            "perPage": 3,
            "start": "2020-01-01T00:00:00Z",
            "end": "2020-01-03T00:00:00Z",
            "project": [1, 2],
        }))
        .unwrap();
        assert_eq!(req.trend_function.as_deref(), Some("p95()"));
        assert_eq!(req.field, vec!["transaction", "project"]);
        assert_eq!(req.orderby(), vec!["-trend_percentage()"]);
        assert_eq!(req.interval.unwrap().as_secs(), 3600);
        assert_eq!(req.per_page, Some(3));
        assert_eq!(req.params.project_ids, vec![1, 2]);
        assert!(req.params.environments.is_empty());
    }

    #[test]
    fn reversed_range_rejected() {
        let req = TrendsRequest::new(QueryParams {
            start: "2020-01-03T00:00:00Z".parse().unwrap(),
            end: "2020-01-01T00:00:00Z".parse().unwrap(),
            project_ids: vec![1],
            environments: vec![],
        });
        let err = req.validate().unwrap_err();
        assert_eq!(*err.reason(), CoreReason::InvalidRequest);
    }
}
