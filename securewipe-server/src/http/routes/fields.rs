//! Presence rules for JSON request fields
//!
//! A field is present when its value is truthy. `null`, `false`, `0` and
//! `""` count as absent. Strings pass through unchanged; any other value
//! keeps its JSON text, so `42` becomes `"42"`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The field's text if the value is truthy.
pub fn truthy(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// `deserialize_with` adapter for optional request fields.
pub fn optional_truthy<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(truthy))
}
