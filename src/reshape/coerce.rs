//! Lenient numeric coercion for loosely typed upstream fields
//!
//! Trend records arrive with `pct_change` sometimes numeric, sometimes a
//! numeric string, sometimes null or absent. Coercion happens once, at the
//! deserialization edge, so every reader sees the same value.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a field as `f64`, substituting 0.0 for anything unparseable
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_f64(&value))
}

/// Coercion policy: numbers pass through, numeric strings are parsed,
/// everything else (null, bool, array, object, bad string) becomes 0.0
#[must_use]
pub fn to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Round to one decimal place for display
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
