//! Completion gate
//!
//! The single point that finalizes an invocation with its HTTP-shaped
//! response. The gate resolves exactly once: a second resolution is an
//! `AlreadyCompleted` error, and an invocation that ends without resolving
//! surfaces as `NeverCompleted`.

use crate::{CoreError, HttpResponse};

/// Single-fire holder for the final HTTP response of an invocation
#[derive(Debug, Default)]
pub struct CompletionGate {
    resolved: Option<HttpResponse>,
}

impl CompletionGate {
    /// Create an unresolved gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the gate with the final response
    pub fn resolve(&mut self, response: HttpResponse) -> Result<(), CoreError> {
        if self.resolved.is_some() {
            return Err(CoreError::AlreadyCompleted);
        }
        self.resolved = Some(response);
        Ok(())
    }

    /// Whether the gate has been resolved
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Take the final response out of the gate
    pub fn into_response(self) -> Result<HttpResponse, CoreError> {
        self.resolved.ok_or(CoreError::NeverCompleted)
    }
}
