//! Inbound invocation envelope and the derived request
//!
//! The envelope is the raw serverless event: a body that may arrive either
//! as JSON text or as an already-structured value, query parameters and
//! headers. The init step derives the read-only `Request` from it.

use portico_core::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::util::clean;

/// Raw serverless invocation event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Request body: JSON text or an already-structured value
    #[serde(default)]
    pub body: Option<Value>,

    /// Query string parameters
    #[serde(default, rename = "queryStringParameters")]
    pub query_string_parameters: HashMap<String, String>,

    /// Request headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// The parsed request, derived once from the envelope and read-only after
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Decoded structured body
    pub body: Value,

    /// Query string parameters
    pub query_string: HashMap<String, String>,

    /// Request headers
    pub headers: HashMap<String, String>,
}

impl Request {
    /// Derive a request from the envelope, decoding a JSON-text body
    pub fn from_envelope(envelope: &Envelope) -> Result<Self, CoreError> {
        let body = match &envelope.body {
            Some(Value::String(text)) => serde_json::from_str(text)?,
            Some(Value::Null) | None => Value::Object(serde_json::Map::new()),
            Some(value) => value.clone(),
        };

        Ok(Self {
            body,
            query_string: envelope.query_string_parameters.clone(),
            headers: envelope.headers.clone(),
        })
    }

    /// The caller-supplied API key, empty when absent
    pub fn apikey(&self) -> String {
        clean(self.body.get("apikey"))
    }

    /// The caller-supplied secondary key, empty when absent
    pub fn authkey(&self) -> String {
        clean(self.body.get("authkey"))
    }

    /// The business method selected by the request, empty when absent
    pub fn method(&self) -> String {
        clean(self.body.get("method"))
    }

    /// The raw mode value, if any
    pub fn mode(&self) -> Option<&Value> {
        self.body.get("mode")
    }

    /// The per-operation data payload; `null` counts as absent
    pub fn data(&self) -> Option<&Value> {
        match self.body.get("data") {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }
}
