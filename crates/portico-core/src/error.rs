use thiserror::Error;

/// Core error type for the Portico invocation substrate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A step name was registered twice
    #[error("Step already registered: {0}")]
    DuplicateStep(String),

    /// A step was invoked that was never registered
    #[error("Unknown step: {0}")]
    UnknownStep(String),

    /// State store error
    #[error("State store error: {0}")]
    StateStoreError(String),

    /// Step execution error
    #[error("Step execution error: {0}")]
    StepExecutionError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// External service error
    #[error("Service error: {0}")]
    ServiceError(String),

    /// The completion gate was resolved a second time
    #[error("Invocation already completed")]
    AlreadyCompleted,

    /// The invocation finished without resolving the completion gate
    #[error("Invocation never completed")]
    NeverCompleted,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

impl From<String> for CoreError {
    fn from(err: String) -> Self {
        CoreError::Other(err)
    }
}

impl From<&str> for CoreError {
    fn from(err: &str) -> Self {
        CoreError::Other(err.to_string())
    }
}
