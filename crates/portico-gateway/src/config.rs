//! Configuration for the Portico gateway
//!
//! Loaded from environment variables with sane defaults; invalid values
//! warn and fall back rather than failing the invocation.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};

use crate::error::GatewayError;

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the business-object service
    #[serde(default)]
    pub service_url: String,

    /// Timeout for a single service call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Whether the terminal path writes an audit-log record before responding
    #[serde(default)]
    pub audit_log: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            service_url: String::new(),
            request_timeout_secs: default_timeout_secs(),
            audit_log: false,
            log_level: default_log_level(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self, GatewayError> {
        let mut config = Self::default();

        if let Ok(service_url) = env::var("PORTICO_SERVICE_URL") {
            config.service_url = service_url;
        }

        if let Ok(timeout) = env::var("PORTICO_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                config.request_timeout_secs = secs;
            } else {
                warn!("Invalid PORTICO_REQUEST_TIMEOUT_SECS value: {}", timeout);
            }
        }

        if let Ok(audit) = env::var("PORTICO_AUDIT_LOG") {
            config.audit_log = audit.to_lowercase() == "true" || audit == "1";
        }

        if let Ok(log_level) = env::var("PORTICO_LOG_LEVEL") {
            config.log_level = log_level;
        }

        if config.service_url.is_empty() {
            return Err(GatewayError::ConfigError(
                "Service URL is required".to_string(),
            ));
        }

        info!("Loaded gateway configuration");
        Ok(config)
    }
}
