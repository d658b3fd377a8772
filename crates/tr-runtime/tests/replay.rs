//! Replay a request file against a fixture file and check the JSON response.

use std::path::Path;

use serde_json::{Value, json};
use tr_config::TrendsConfig;
use tr_core::CoreReason;
use tr_runtime::{Mode, RuntimeReason, replay};

fn write(dir: &Path, name: &str, value: &Value) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn rows(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| json!({"transaction": format!("/t{i}"), "trend_percentage()": 1.5}))
        .collect()
}

fn request_json() -> Value {
    json!({
        "trendFunction": "p95()",
        "field": ["transaction"],
        "query": "t_score():>6",
        "sort": ["-trend_percentage()"],
        "start": "2020-01-01T00:00:00Z",
        "end": "2020-01-03T00:00:00Z",
        "project": [1],
    })
}

// ---------------------------------------------------------------------------
// 1. stats mode: 7 ranked rows, one page of 5 with series
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stats_replay_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let series: serde_json::Map<String, Value> = (0..7)
        .map(|i| {
            (
                format!("/t{i}"),
                json!({"order": i, "start": 0, "end": 3600, "data": [{"time": 0, "value": 1.0}]}),
            )
        })
        .collect();
    let request = write(dir.path(), "request.json", &request_json());
    let fixture = write(
        dir.path(),
        "fixture.json",
        &json!({"events": {"data": rows(7)}, "series": series}),
    );

    let out = replay(&TrendsConfig::default(), &request, &fixture, Mode::Stats)
        .await
        .unwrap();
    assert_eq!(out.calls.len(), 2);

    let v = serde_json::to_value(&out).unwrap();
    let results = &v["response"]["results"];
    assert_eq!(results["events"]["data"].as_array().unwrap().len(), 5);
    assert_eq!(results["events"]["meta"]["transaction"], "string");
    assert_eq!(results["stats"].as_object().unwrap().len(), 5);
    assert_eq!(v["response"]["next"], json!({"cursor": "0:5:0", "results": true}));

    let events_call = &v["calls"][0];
    assert_eq!(events_call["kind"], "events");
    assert_eq!(events_call["limit"], 6);
    assert!(!events_call["query"].as_str().unwrap().contains("t_score()"));
    assert_eq!(v["calls"][1]["kind"], "timeseries");
    assert_eq!(v["calls"][1]["top_events"].as_array().unwrap().len(), 5);
}

// ---------------------------------------------------------------------------
// 2. failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn series_failure_surfaces_as_upstream_error() {
    let dir = tempfile::tempdir().unwrap();
    let request = write(dir.path(), "request.json", &request_json());
    let fixture = write(
        dir.path(),
        "fixture.json",
        &json!({"events": {"data": rows(2)}, "fail": "timeseries"}),
    );
    let err = replay(&TrendsConfig::default(), &request, &fixture, Mode::Stats)
        .await
        .unwrap_err();
    assert_eq!(*err.reason(), RuntimeReason::Core(CoreReason::UpstreamQuery));
}

#[tokio::test]
async fn plain_mode_ignores_series_failure() {
    let dir = tempfile::tempdir().unwrap();
    let request = write(dir.path(), "request.json", &request_json());
    let fixture = write(
        dir.path(),
        "fixture.json",
        &json!({"events": {"data": rows(2)}, "fail": "timeseries"}),
    );
    let out = replay(&TrendsConfig::default(), &request, &fixture, Mode::Plain)
        .await
        .unwrap();
    assert_eq!(out.calls.len(), 1);
    let v = serde_json::to_value(&out.response).unwrap();
    assert_eq!(v["results"]["data"].as_array().unwrap().len(), 2);
    assert_eq!(v["next"]["results"], json!(false));
}

#[tokio::test]
async fn no_projects_returns_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let mut req = request_json();
    req["project"] = json!([]);
    let request = write(dir.path(), "request.json", &req);
    let fixture = write(dir.path(), "fixture.json", &json!({}));
    let out = replay(&TrendsConfig::default(), &request, &fixture, Mode::Stats)
        .await
        .unwrap();
    assert!(out.calls.is_empty());
    assert_eq!(serde_json::to_value(&out.response).unwrap(), json!([]));
}

#[tokio::test]
async fn malformed_request_file_is_bootstrap_error() {
    let dir = tempfile::tempdir().unwrap();
    let request = dir.path().join("request.json");
    std::fs::write(&request, "{not json").unwrap();
    let fixture = write(dir.path(), "fixture.json", &json!({}));
    let err = replay(&TrendsConfig::default(), &request, &fixture, Mode::Plain)
        .await
        .unwrap_err();
    assert_eq!(*err.reason(), RuntimeReason::Bootstrap);
}
