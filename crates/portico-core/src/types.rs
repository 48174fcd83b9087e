use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::CoreError;

/// The single terminal response of an invocation, before it is shaped
/// into HTTP form.
///
/// Every field is optional on the wire and defaults the same way on every
/// path: `data` to an empty object, `headers` to an empty mapping and
/// `http_status` to 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Body payload, JSON-encoded into the HTTP body at the end
    #[serde(default = "default_data")]
    pub data: Value,

    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// HTTP status code
    #[serde(default = "default_status", rename = "httpStatus")]
    pub http_status: u16,
}

fn default_data() -> Value {
    Value::Object(serde_json::Map::new())
}

fn default_status() -> u16 {
    200
}

impl Default for Response {
    fn default() -> Self {
        Self {
            data: default_data(),
            headers: HashMap::new(),
            http_status: default_status(),
        }
    }
}

impl Response {
    /// Create a 200 response carrying the given data
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Create a response carrying the given data and status code
    pub fn with_status(data: Value, http_status: u16) -> Self {
        Self {
            data,
            http_status,
            ..Self::default()
        }
    }

    /// Shape the response into its HTTP form, JSON-encoding the data
    pub fn into_http(self) -> Result<HttpResponse, CoreError> {
        let body = serde_json::to_string(&self.data)?;
        Ok(HttpResponse {
            status_code: self.http_status,
            headers: self.headers,
            body,
        })
    }
}

/// The HTTP-shaped outbound response handed back to the hosting environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    /// HTTP status code
    pub status_code: u16,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// JSON text of the response data
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_defaults() {
        let response = Response::default();
        assert_eq!(response.http_status, 200);
        assert_eq!(response.data, json!({}));
        assert!(response.headers.is_empty());
    }

    #[test]
    fn test_response_defaults_from_partial_json() {
        let response: Response = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.http_status, 200);
        assert_eq!(response.data, json!({}));

        let response: Response =
            serde_json::from_value(json!({ "httpStatus": 401, "data": {"error": "nope"} }))
                .unwrap();
        assert_eq!(response.http_status, 401);
        assert_eq!(response.data, json!({"error": "nope"}));
    }

    #[test]
    fn test_into_http_encodes_data() {
        let response = Response::with_status(json!({"error": "Missing data."}), 403);
        let http = response.into_http().unwrap();
        assert_eq!(http.status_code, 403);
        assert_eq!(http.body, r#"{"error":"Missing data."}"#);
    }

    #[test]
    fn test_json_round_trip() {
        // Encoding a response and decoding the produced body yields the data back
        let data = json!({
            "method": "person-search",
            "status": "OK",
            "data": [{"firstname": "Ada", "lastname": "Lovelace"}]
        });
        let http = Response::ok(data.clone()).into_http().unwrap();
        let decoded: Value = serde_json::from_str(&http.body).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_http_response_wire_shape() {
        let http = Response::ok(json!({"a": 1})).into_http().unwrap();
        let wire = serde_json::to_value(&http).unwrap();
        assert_eq!(wire["statusCode"], 200);
        assert!(wire["headers"].as_object().unwrap().is_empty());
        assert_eq!(wire["body"], r#"{"a":1}"#);
    }
}
