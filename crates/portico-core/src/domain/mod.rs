//! Domain layer for the Portico substrate

/// Per-invocation scoped state store
pub mod store;

/// Steps, step inputs, and transitions
pub mod step;

/// External business-object service contract
pub mod service;
