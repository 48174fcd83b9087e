//! External business-object service contract
//!
//! The remote service is an external collaborator: the pipeline only depends
//! on the shapes below. Implementations live outside this crate (an HTTP
//! client for real deployments, an in-memory scripted client for tests).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::CoreError;

/// A field selected by a search or written by an invoke
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name on the remote object
    pub name: String,
}

impl Field {
    /// Create a field selection by name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Comparison operator for a search filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Comparison {
    /// Exact equality
    EqualTo,
    /// Negated equality
    NotEqualTo,
    /// Substring match
    TextIsLike,
}

/// A single search filter clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Field name the clause applies to
    pub field: String,
    /// Comparison operator
    pub comparison: Comparison,
    /// Comparison value
    pub value: String,
}

impl Filter {
    /// Create an equality filter clause
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            comparison: Comparison::EqualTo,
            value: value.into(),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

/// A sort clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    /// Field name to order on
    pub name: String,
    /// Direction to order in
    pub direction: SortDirection,
}

impl Sort {
    /// Create an ascending sort clause
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: SortDirection::Asc,
        }
    }
}

/// A search against a remote business object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Remote object name, e.g. "setup_user"
    pub object: String,

    /// Fields to return
    pub fields: Vec<Field>,

    /// Filter clauses, all of which must match
    #[serde(default)]
    pub filters: Vec<Filter>,

    /// Sort clauses
    #[serde(default)]
    pub sorts: Vec<Sort>,

    /// Maximum number of rows to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_limit: Option<u32>,
}

impl SearchRequest {
    /// Create a search against the given object
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            fields: Vec::new(),
            filters: Vec::new(),
            sorts: Vec::new(),
            row_limit: None,
        }
    }

    /// Select the given fields
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    /// Apply the given filter clauses
    pub fn with_filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters = filters.into_iter().collect();
        self
    }

    /// Apply the given sort clauses
    pub fn with_sorts(mut self, sorts: impl IntoIterator<Item = Sort>) -> Self {
        self.sorts = sorts.into_iter().collect();
        self
    }

    /// Cap the number of returned rows
    pub fn with_row_limit(mut self, rows: u32) -> Self {
        self.row_limit = Some(rows);
        self
    }
}

/// A method or object invocation against the remote service
///
/// Used for the profile fetch (`method`) and for audit-log writes
/// (`object` plus field values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeRequest {
    /// Remote method name, if invoking a method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Remote object name, if writing to an object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    /// Field values to write
    #[serde(default)]
    pub fields: Value,
}

impl InvokeRequest {
    /// Invoke a remote method by name
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            method: Some(name.into()),
            object: None,
            fields: Value::Null,
        }
    }

    /// Write field values to a remote object
    pub fn object(name: impl Into<String>, fields: Value) -> Self {
        Self {
            method: None,
            object: Some(name.into()),
            fields,
        }
    }
}

/// A second-factor logon against the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogonRequest {
    /// Username to log on as
    pub logon: String,
    /// Password (the caller-supplied secondary key)
    pub password: String,
}

impl LogonRequest {
    /// Create a logon request
    pub fn new(logon: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            logon: logon.into(),
            password: password.into(),
        }
    }
}

/// Any one call a step can issue against the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServiceRequest {
    /// A search call
    Search(SearchRequest),
    /// An invoke call
    Invoke(InvokeRequest),
    /// A logon call
    Logon(LogonRequest),
}

impl ServiceRequest {
    /// Short name of the call kind, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceRequest::Search(_) => "search",
            ServiceRequest::Invoke(_) => "invoke",
            ServiceRequest::Logon(_) => "logon",
        }
    }
}

/// Status reported by the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    /// The call succeeded
    #[serde(rename = "OK")]
    Ok,
    /// The call failed
    #[serde(rename = "ER")]
    Er,
}

impl ServiceStatus {
    /// Whether the call failed
    pub fn is_error(&self) -> bool {
        matches!(self, ServiceStatus::Er)
    }
}

/// Result delivered by the remote service to a continuation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    /// Call status
    pub status: ServiceStatus,

    /// Result payload; searches carry their matches under `rows`
    #[serde(default)]
    pub data: Value,
}

impl ServiceResponse {
    /// Create a successful response carrying the given payload
    pub fn ok(data: Value) -> Self {
        Self {
            status: ServiceStatus::Ok,
            data,
        }
    }

    /// Create an error response carrying a message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Er,
            data: serde_json::json!({ "error": message.into() }),
        }
    }

    /// The matched rows of a search response, empty when absent
    pub fn rows(&self) -> &[Value] {
        self.data
            .get("rows")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The first matched row, if any
    pub fn first_row(&self) -> Option<&Value> {
        self.rows().first()
    }
}

/// Client for the remote business-object service
///
/// Each pipeline step issues at most one call before yielding; the
/// dispatcher resumes the named continuation step with the result.
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// Search a remote object
    async fn search(&self, request: SearchRequest) -> Result<ServiceResponse, CoreError>;

    /// Invoke a remote method or write to a remote object
    async fn invoke(&self, request: InvokeRequest) -> Result<ServiceResponse, CoreError>;

    /// Perform a logon
    async fn logon(&self, request: LogonRequest) -> Result<ServiceResponse, CoreError>;

    /// Dispatch a request to the matching operation
    async fn call(&self, request: ServiceRequest) -> Result<ServiceResponse, CoreError> {
        match request {
            ServiceRequest::Search(search) => self.search(search).await,
            ServiceRequest::Invoke(invoke) => self.invoke(invoke).await,
            ServiceRequest::Logon(logon) => self.logon(logon).await,
        }
    }
}
