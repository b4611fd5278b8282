//! Read-side filter that keeps only recognized preference groups.

use serde_json::Value;
use tracing::debug;

use crate::error::SnapshotError;
use crate::types::{PreferenceGroup, PreferenceSnapshot};

/// Keep only recognized top-level groups, or `None` if the root is not an object.
pub fn filter_groups(value: &Value) -> Option<PreferenceSnapshot> {
    try_filter_groups(value)
        .map_err(|e| debug!("snapshot rejected: {e}"))
        .ok()
}

/// Keep only recognized top-level groups.
///
/// Unknown groups are dropped silently so that payloads written by newer
/// clients still load.
///
/// # Errors
/// Returns `SnapshotError::MalformedStructure` if `value` is not a JSON object.
pub fn try_filter_groups(value: &Value) -> Result<PreferenceSnapshot, SnapshotError> {
    let obj = value.as_object().ok_or_else(|| {
        SnapshotError::MalformedStructure(format!("expected object, got {}", kind_of(value)))
    })?;

    let mut snapshot = PreferenceSnapshot::new();
    let mut dropped = 0usize;
    for (name, group_value) in obj {
        match PreferenceGroup::from_name(name) {
            Some(group) => {
                snapshot.insert(group, group_value.clone());
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(dropped, "ignored unrecognized preference groups");
    }
    Ok(snapshot)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
