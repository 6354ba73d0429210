//! Hashing and comparison of resource parameter trees.
//!
//! Parameters are opaque JSON values forwarded to converters. The cache keys
//! them by the hash of their serialized form, and confirms a hit with a full
//! structural comparison.

use serde_json::Value;

use crate::hash::ContentHash;

/// Hashes a parameter tree.
///
/// Object keys are serialized in sorted order, so two trees that differ only
/// in the declaration order of their keys hash identically.
pub fn hash_params(params: &Value) -> ContentHash {
    // Serializing a `Value` into memory cannot fail: all map keys are strings.
    let bytes = serde_json::to_vec(params).unwrap_or_default();
    ContentHash::from_bytes(&bytes)
}

/// Returns `true` if two parameter trees are structurally identical.
///
/// Arrays are compared element by element in order. Numbers compare by their
/// JSON representation, so `1` and `1.0` are different parameters.
pub fn params_equivalent(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .all(|(key, value)| right.get(key).is_some_and(|other| params_equivalent(value, other)))
        }
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|(value, other)| params_equivalent(value, other))
        }
        _ => a == b,
    }
}
