//! Small projection helpers

use serde_json::Value;

/// Coerce a field value to a clean string
///
/// Absent values and nulls become the empty string; strings are trimmed of
/// surrounding whitespace; anything else is rendered as JSON text.
pub fn clean(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}
