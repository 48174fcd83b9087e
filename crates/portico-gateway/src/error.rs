//! Error types for the Portico gateway

use portico_core::CoreError;
use thiserror::Error;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error raised by the invocation substrate
    #[error(transparent)]
    Core(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_passes_through() {
        let error: GatewayError = CoreError::UnknownStep("app-missing".to_string()).into();
        assert_eq!(error.to_string(), "Unknown step: app-missing");
    }

    #[test]
    fn test_config_error_display() {
        let error = GatewayError::ConfigError("service URL is required".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: service URL is required"
        );
    }
}
