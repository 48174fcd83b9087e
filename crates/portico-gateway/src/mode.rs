//! Request mode normalization
//!
//! The caller may supply `mode` as a bare string, as an object, or not at
//! all. Normalization is a pure function returning a fully-defaulted value;
//! nothing is patched in place.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mode type of a normal business invocation
pub const LIVE: &str = "live";

/// Mode type of the diagnostic echo short-circuit
pub const REFLECT: &str = "reflect";

/// Normalized request mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mode {
    /// Mode type, e.g. "live" or "reflect"
    #[serde(rename = "type")]
    pub mode_type: String,

    /// Upper-cased status, defaulted to "OK"
    pub status: String,

    /// Optional caller-supplied data echoed into a reflect response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Mode {
    /// Normalize a raw mode value
    ///
    /// A bare string becomes `{type: <string>, status: "OK"}`; an absent
    /// mode becomes `{type: "live", status: "OK"}`; an object gets its
    /// missing status defaulted; status is always upper-cased.
    pub fn normalize(value: Option<&Value>) -> Self {
        let (mode_type, status, data) = match value {
            Some(Value::String(mode_type)) => (mode_type.clone(), None, None),
            Some(Value::Object(map)) => (
                map.get("type")
                    .and_then(Value::as_str)
                    .unwrap_or(LIVE)
                    .to_string(),
                map.get("status").and_then(Value::as_str).map(String::from),
                map.get("data").cloned(),
            ),
            _ => (LIVE.to_string(), None, None),
        };

        Self {
            mode_type,
            status: status.unwrap_or_else(|| "OK".to_string()).to_uppercase(),
            data,
        }
    }

    /// Whether this invocation short-circuits into the diagnostic echo
    pub fn is_reflect(&self) -> bool {
        self.mode_type == REFLECT
    }
}
