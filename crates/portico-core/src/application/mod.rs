//! Application services for the Portico substrate

/// Completion gate
pub mod completion;

/// Step registry and dispatcher
pub mod dispatcher;
