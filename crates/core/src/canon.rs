//! Canonical JSON serialization for artifact fingerprinting
//!
//! The model artifact's checksum must be reproducible across runs and
//! platforms, so the hashed form sorts all object keys recursively and
//! emits no whitespace.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Serialize a value to canonical JSON (sorted keys, compact).
pub fn to_canonical_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let raw = serde_json::to_value(value)?;
    serde_json::to_string(&sort_keys(&raw))
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.iter().map(|(k, v)| (k.clone(), sort_keys(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Blake3 hash of the canonical JSON form, as a hex string.
pub fn hash_canonical_hex<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let json = to_canonical_json(value)?;
    Ok(hex::encode(blake3::hash(json.as_bytes()).as_bytes()))
}
