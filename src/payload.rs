//! Top-level shape check of the collector payload.
//!
//! Accepted: a bare array of records, or an object with an `items` array and an
//! optional `generated_at` / `updated_at` (or `meta.generated_at`). An object
//! without a usable `items` array is an empty feed. A scalar payload breaks the
//! input contract and is reported to the caller.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::warn;

use crate::ingest::types::RawRecord;

const GENERATED_AT_KEYS: &[&str] = &["generated_at", "updated_at"];

#[derive(Debug, Clone, Default)]
pub struct Payload {
    pub records: Vec<RawRecord>,
    /// Collector-supplied generation time, unparsed.
    pub generated_at: Option<Value>,
    /// Array entries that were not objects.
    pub skipped: usize,
}

/// Parse raw payload bytes as JSON, then shape-check.
pub fn parse_bytes(bytes: &[u8]) -> Result<Payload> {
    let v: Value = serde_json::from_slice(bytes).context("payload is not valid JSON")?;
    extract(&v)
}

pub fn extract(v: &Value) -> Result<Payload> {
    match v {
        Value::Array(list) => Ok(collect_records(list, None)),
        Value::Object(map) => {
            let generated_at = GENERATED_AT_KEYS
                .iter()
                .filter_map(|k| map.get(*k))
                .chain(map.get("meta").and_then(|m| m.get("generated_at")))
                .find(|v| !v.is_null())
                .cloned();
            match map.get("items") {
                Some(Value::Array(list)) => Ok(collect_records(list, generated_at)),
                other => {
                    warn!(
                        target: "ingest",
                        items = ?other.map(kind),
                        "payload object has no `items` array; treating as empty"
                    );
                    Ok(Payload {
                        generated_at,
                        ..Payload::default()
                    })
                }
            }
        }
        other => bail!(
            "payload must be a list of records or an object with `items`, got {}",
            kind(other)
        ),
    }
}

fn collect_records(list: &[Value], generated_at: Option<Value>) -> Payload {
    let mut records = Vec::with_capacity(list.len());
    let mut skipped = 0usize;
    for entry in list {
        match entry {
            Value::Object(map) => records.push(map.clone()),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(target: "ingest", skipped, "non-object payload entries skipped");
    }
    Payload {
        records,
        generated_at,
        skipped,
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_is_accepted() {
        let p = extract(&json!([{"title": "a"}, "junk", {"title": "b"}, 3])).unwrap();
        assert_eq!(p.records.len(), 2);
        assert_eq!(p.skipped, 2);
        assert!(p.generated_at.is_none());
    }

    #[test]
    fn wrapped_items_with_generated_at() {
        let p = extract(&json!({
            "items": [{"title": "a"}],
            "generated_at": "2025-09-08T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(p.records.len(), 1);
        assert_eq!(p.generated_at, Some(json!("2025-09-08T12:00:00Z")));
    }

    #[test]
    fn meta_generated_at_is_a_fallback() {
        let p = extract(&json!({
            "items": [],
            "meta": {"generated_at": "2025-09-08T12:00:00+00:00"}
        }))
        .unwrap();
        assert_eq!(p.generated_at, Some(json!("2025-09-08T12:00:00+00:00")));

        let q = extract(&json!({
            "items": [],
            "updated_at": 1_757_000_000,
            "meta": {"generated_at": "ignored"}
        }))
        .unwrap();
        assert_eq!(q.generated_at, Some(json!(1_757_000_000)));
    }

    #[test]
    fn object_without_items_is_empty_not_error() {
        let p = extract(&json!({"articles": [{"title": "a"}]})).unwrap();
        assert!(p.records.is_empty());
        let q = extract(&json!({"items": "nope"})).unwrap();
        assert!(q.records.is_empty());
    }

    #[test]
    fn scalar_payload_is_contract_violation() {
        assert!(extract(&json!("items")).is_err());
        assert!(extract(&json!(null)).is_err());
        assert!(extract(&json!(12)).is_err());
    }

    #[test]
    fn bytes_must_be_json() {
        assert!(parse_bytes(b"<rss></rss>").is_err());
        assert_eq!(parse_bytes(br#"[{"title":"x"}]"#).unwrap().records.len(), 1);
    }
}
