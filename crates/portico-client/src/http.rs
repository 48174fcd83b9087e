//! HTTP implementation of the business-object service client
//!
//! Posts JSON request bodies to the service endpoint. Transport failures and
//! non-success statuses are reported as `ER` service responses so the
//! pipeline's recoverable error paths handle them; the invocation only
//! aborts on programming errors.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use portico_core::{
    CoreError, InvokeRequest, LogonRequest, SearchRequest, ServiceClient, ServiceResponse,
};

/// HTTP client for a remote business-object service
#[derive(Debug, Clone)]
pub struct HttpServiceClient {
    /// Base URL of the service
    base_url: String,

    /// HTTP client
    client: Client,
}

impl HttpServiceClient {
    /// Create a client against the given base URL
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::ServiceError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// URL of a service operation
    fn operation_url(&self, operation: &str) -> String {
        format!("{}/{}", self.base_url, operation)
    }

    /// Post a request body to an operation and decode the service response
    async fn post<T: Serialize>(&self, operation: &str, request: &T) -> ServiceResponse {
        let url = self.operation_url(operation);
        debug!(%url, "calling business-object service");

        let response = match self.client.post(&url).json(request).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "service call failed to send");
                return ServiceResponse::error(e.to_string());
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%url, %status, "service call returned error status");
            return ServiceResponse::error(format!("{}: {}", status, body));
        }

        match response.json::<ServiceResponse>().await {
            Ok(service_response) => service_response,
            Err(e) => {
                warn!(%url, error = %e, "service response was not decodable");
                ServiceResponse::error(e.to_string())
            }
        }
    }
}

#[async_trait]
impl ServiceClient for HttpServiceClient {
    async fn search(&self, request: SearchRequest) -> Result<ServiceResponse, CoreError> {
        Ok(self.post("search", &request).await)
    }

    async fn invoke(&self, request: InvokeRequest) -> Result<ServiceResponse, CoreError> {
        Ok(self.post("invoke", &request).await)
    }

    async fn logon(&self, request: LogonRequest) -> Result<ServiceResponse, CoreError> {
        // The request body carries the caller's secondary key; never log it
        Ok(self.post("logon", &request).await)
    }
}
