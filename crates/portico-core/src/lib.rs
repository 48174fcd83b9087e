//!
//! Portico Core - invocation substrate for the Portico proxy API
//!
//! This crate defines the per-invocation execution substrate: the scoped
//! state store, the step registry and dispatcher, the transition model for
//! asynchronous service continuations, the completion gate, and the contract
//! of the external business-object service. The pipeline itself lives in
//! the `portico-gateway` crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - steps, state store, service contract
pub mod domain;

/// Application services - dispatcher and completion gate
pub mod application;

/// Core types
pub mod types;

/// Error types
pub mod error;

// Re-export key types
pub use error::CoreError;
pub use types::{HttpResponse, Response};

pub use domain::service::{
    Comparison, Field, Filter, InvokeRequest, LogonRequest, SearchRequest, ServiceClient,
    ServiceRequest, ServiceResponse, ServiceStatus, Sort, SortDirection,
};
pub use domain::step::{Step, StepInput, StepName, Transition};
pub use domain::store::ScopedStore;

pub use application::completion::CompletionGate;
pub use application::dispatcher::{Dispatcher, StepRegistry};
