//! Workflow state snapshot helpers.
//!
//! Snapshots are free-form JSON. A step's results live under
//! `output[<step name>]` when the snapshot carries an `output` object (the
//! state machine layout); otherwise the snapshot root is the step entry.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::{CanonicalStatus, JobId};

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

/// Locate (creating if needed) the namespaced entry for `step`.
pub fn step_entry_mut<'a>(snapshot: &'a mut Value, step: &str) -> &'a mut Map<String, Value> {
    let root = ensure_object(snapshot);
    if !matches!(root.get("output"), Some(Value::Object(_))) {
        return root;
    }
    let output = ensure_object(root.entry("output").or_insert(Value::Null));
    ensure_object(output.entry(step.to_string()).or_insert(Value::Null))
}

/// Record a terminal status and the `metrics.t1` completion time.
///
/// Existing metrics keys (such as `t0`) are preserved.
pub fn stamp_completion(entry: &mut Map<String, Value>, status: CanonicalStatus, now: DateTime<Utc>) {
    entry.insert("status".to_string(), Value::from(status.as_str()));
    let metrics = ensure_object(entry.entry("metrics").or_insert(Value::Null));
    metrics.insert("t1".to_string(), Value::from(now.timestamp_millis()));
}

/// Record the start of an external job: `jobId`, `status: started` and `metrics.t0`.
pub fn stamp_start(entry: &mut Map<String, Value>, job_id: &JobId, now: DateTime<Utc>) {
    entry.insert("jobId".to_string(), Value::from(job_id.as_str()));
    entry.insert("status".to_string(), Value::from(CanonicalStatus::Started.as_str()));
    let metrics = ensure_object(entry.entry("metrics").or_insert(Value::Null));
    metrics.insert("t0".to_string(), Value::from(now.timestamp_millis()));
}
