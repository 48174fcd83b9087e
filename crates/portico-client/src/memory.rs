//! In-memory implementation of the business-object service client
//!
//! Primarily useful for development and tests: identities, passwords and
//! object tables are seeded up front, individual operations can be forced to
//! fail, and every issued request is recorded for assertions.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::debug;

use portico_core::{
    Comparison, CoreError, InvokeRequest, LogonRequest, SearchRequest, ServiceClient,
    ServiceRequest, ServiceResponse, SortDirection,
};

/// Remote method that returns the caller's profile record
pub const USER_DETAILS_METHOD: &str = "core_get_user_details";

/// In-memory scripted business-object service
#[derive(Debug, Default)]
pub struct MemoryServiceClient {
    /// Username passwords, keyed by username
    passwords: HashMap<String, String>,

    /// Profile record returned by the user-details method
    profile: Value,

    /// Object tables, keyed by object name
    tables: HashMap<String, Vec<Value>>,

    /// Operations forced to report an error status
    failures: HashSet<String>,

    /// Every request issued against this client, in order
    requests: Mutex<Vec<ServiceRequest>>,
}

impl MemoryServiceClient {
    /// Create an empty client
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an identity: a `setup_user` row plus a logon password
    pub fn with_user(
        mut self,
        guid: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let username = username.into();
        self.tables
            .entry("setup_user".to_string())
            .or_default()
            .push(json!({ "guid": guid.into(), "username": username }));
        self.passwords.insert(username, password.into());
        self
    }

    /// Seed the profile record returned by the user-details method
    pub fn with_profile(mut self, profile: Value) -> Self {
        self.profile = profile;
        self
    }

    /// Seed rows for an object table
    pub fn with_rows(mut self, object: impl Into<String>, rows: Vec<Value>) -> Self {
        self.tables.insert(object.into(), rows);
        self
    }

    /// Force an operation ("search", "invoke" or "logon") or searches of one
    /// named object to report `ER`
    pub fn with_failing(mut self, operation: impl Into<String>) -> Self {
        self.failures.insert(operation.into());
        self
    }

    /// Every request issued so far, in order
    pub fn requests(&self) -> Vec<ServiceRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    /// Every search issued so far, in order
    pub fn searches(&self) -> Vec<SearchRequest> {
        self.requests()
            .into_iter()
            .filter_map(|request| match request {
                ServiceRequest::Search(search) => Some(search),
                _ => None,
            })
            .collect()
    }

    fn record(&self, request: ServiceRequest) {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request);
    }

    fn matches(filter_value: &str, comparison: Comparison, row_value: &Value) -> bool {
        let row_value = match row_value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        match comparison {
            Comparison::EqualTo => row_value == filter_value,
            Comparison::NotEqualTo => row_value != filter_value,
            Comparison::TextIsLike => row_value.contains(filter_value),
        }
    }
}

#[async_trait]
impl ServiceClient for MemoryServiceClient {
    async fn search(&self, request: SearchRequest) -> Result<ServiceResponse, CoreError> {
        self.record(ServiceRequest::Search(request.clone()));

        if self.failures.contains("search") || self.failures.contains(&request.object) {
            return Ok(ServiceResponse::error("search failed"));
        }

        let mut rows: Vec<Value> = self
            .tables
            .get(&request.object)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|row| {
                request.filters.iter().all(|filter| {
                    Self::matches(
                        &filter.value,
                        filter.comparison,
                        row.get(&filter.field).unwrap_or(&Value::Null),
                    )
                })
            })
            .collect();

        if let Some(sort) = request.sorts.first() {
            rows.sort_by(|a, b| {
                let left = a[&sort.name].as_str().unwrap_or_default().to_string();
                let right = b[&sort.name].as_str().unwrap_or_default().to_string();
                match sort.direction {
                    SortDirection::Asc => left.cmp(&right),
                    SortDirection::Desc => right.cmp(&left),
                }
            });
        }

        if let Some(limit) = request.row_limit {
            rows.truncate(limit as usize);
        }

        debug!(object = %request.object, rows = rows.len(), "in-memory search");
        Ok(ServiceResponse::ok(json!({ "rows": rows })))
    }

    async fn invoke(&self, request: InvokeRequest) -> Result<ServiceResponse, CoreError> {
        self.record(ServiceRequest::Invoke(request.clone()));

        if self.failures.contains("invoke") {
            return Ok(ServiceResponse::error("invoke failed"));
        }

        if request.method.as_deref() == Some(USER_DETAILS_METHOD) {
            return Ok(ServiceResponse::ok(self.profile.clone()));
        }

        Ok(ServiceResponse::ok(json!({})))
    }

    async fn logon(&self, request: LogonRequest) -> Result<ServiceResponse, CoreError> {
        self.record(ServiceRequest::Logon(request.clone()));

        if self.failures.contains("logon") {
            return Ok(ServiceResponse::error("logon failed"));
        }

        match self.passwords.get(&request.logon) {
            Some(password) if *password == request.password => Ok(ServiceResponse::ok(json!({
                "logon": request.logon,
            }))),
            _ => Ok(ServiceResponse::error("invalid logon")),
        }
    }
}
