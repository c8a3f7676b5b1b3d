//! Helpers for reading typed overrides out of a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. A missing key
//! or a value of the wrong type yields the default, so callers always get a
//! usable value.

use serde_json::Value;

/// Reads an `f64`, accepting integers as well as floats.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads a `usize` from a non-negative JSON integer.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Reads a `u64` from a non-negative JSON integer.
pub fn param_u64(params: &Value, name: &str, default: u64) -> u64 {
    params.get(name).and_then(Value::as_u64).unwrap_or(default)
}

/// Reads a `bool`.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}
