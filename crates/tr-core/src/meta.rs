use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::engine::{EventResultSet, Row};

/// Event rows annotated with a `column -> type` schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventsPayload {
    pub data: Vec<Row>,
    pub meta: BTreeMap<String, String>,
}

/// Attach schema metadata to a result set.
///
/// Engine-provided types are kept; columns the engine did not describe get
/// a type inferred from the first non-null value.
pub fn with_meta(events: EventResultSet) -> EventsPayload {
    let mut meta = events.meta;
    for row in &events.data {
        for (column, value) in row {
            if meta.contains_key(column) {
                continue;
            }
            if let Some(ty) = infer_type(value) {
                meta.insert(column.clone(), ty.to_string());
            }
        }
    }
    EventsPayload {
        data: events.data,
        meta,
    }
}

fn infer_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some("boolean"),
        Value::Number(n) if n.is_f64() => Some("number"),
        Value::Number(_) => Some("integer"),
        Value::String(_) => Some("string"),
        Value::Array(_) => Some("array"),
        Value::Object(_) => Some("object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn engine_meta_preserved_and_gaps_inferred() {
        let mut events = EventResultSet {
            data: vec![
                row(json!({"transaction": "/a", "count_range_1": null, "t_score": 2.5})),
                row(json!({"transaction": "/b", "count_range_1": 10, "t_score": 1.0})),
            ],
            meta: BTreeMap::new(),
        };
        events.meta.insert("t_score".into(), "number".into());

        let payload = with_meta(events);
        assert_eq!(payload.data.len(), 2);
        assert_eq!(payload.meta["transaction"], "string");
        assert_eq!(payload.meta["count_range_1"], "integer");
        assert_eq!(payload.meta["t_score"], "number");
    }

    #[test]
    fn empty_result_set() {
        let payload = with_meta(EventResultSet::default());
        assert!(payload.data.is_empty());
        assert!(payload.meta.is_empty());
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"data": [], "meta": {}})
        );
    }
}
