//! Pure helper functions for extracting typed parameters from a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. If the key is
//! missing or the value is not the expected type, the default is returned.
//! These never fail; they always produce a usable value.

use serde_json::Value;

/// Extracts an `f32` from `params[name]`, returning `default` if missing or wrong type.
///
/// Accepts both JSON numbers (including integers) and narrows them to f32.
pub fn param_f32(params: &Value, name: &str, default: f32) -> f32 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .unwrap_or(default)
}

/// Extracts a `u32` from `params[name]`, returning `default` if missing or wrong type.
///
/// Only succeeds if the JSON value is a non-negative integer that fits in `u32`.
pub fn param_u32(params: &Value, name: &str, default: u32) -> u32 {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts an RGBA color from `params[name]`, returning `default` if missing or wrong type.
///
/// Accepts a JSON array of three or four numbers; a missing alpha is 1.0.
pub fn param_rgba(params: &Value, name: &str, default: [f32; 4]) -> [f32; 4] {
    let Some(items) = params.get(name).and_then(Value::as_array) else {
        return default;
    };
    let channels: Option<Vec<f32>> = items.iter().map(|v| v.as_f64().map(|c| c as f32)).collect();
    match channels.as_deref() {
        Some(&[r, g, b]) => [r, g, b, 1.0],
        Some(&[r, g, b, a]) => [r, g, b, a],
        _ => default,
    }
}
