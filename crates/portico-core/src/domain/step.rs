//! Steps and transitions
//!
//! A step is a named unit of pipeline logic. Steps communicate through the
//! invocation context and by naming further steps; they never return values
//! to each other directly. A step that needs the remote service issues
//! exactly one call and names the step to resume with the result — the
//! `Transition::Call` variant is that continuation, made explicit so the
//! dispatcher resolves it instead of re-entering by string.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::domain::service::{ServiceRequest, ServiceResponse};
use crate::{CoreError, Response};

/// Value object: the registered name of a step
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepName(pub String);

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StepName {
    fn from(name: &str) -> Self {
        StepName(name.to_string())
    }
}

impl From<String> for StepName {
    fn from(name: String) -> Self {
        StepName(name)
    }
}

/// Arguments a step is invoked with
///
/// `param` is the optional direct-invocation payload; `response` is present
/// only when the step runs as the continuation of an external service call.
#[derive(Debug, Clone, Default)]
pub struct StepInput {
    /// Optional parameter payload
    pub param: Option<Value>,

    /// Service response, when invoked as a continuation
    pub response: Option<ServiceResponse>,
}

impl StepInput {
    /// Input for a direct invocation
    pub fn direct(param: Option<Value>) -> Self {
        Self {
            param,
            response: None,
        }
    }

    /// Input for an invocation-as-continuation
    pub fn continuation(param: Option<Value>, response: ServiceResponse) -> Self {
        Self {
            param,
            response: Some(response),
        }
    }

    /// The delivered service response; an error when the step was not
    /// invoked as a continuation
    pub fn response(&self) -> Result<&ServiceResponse, CoreError> {
        self.response.as_ref().ok_or_else(|| {
            CoreError::StepExecutionError(
                "step invoked without a service response".to_string(),
            )
        })
    }
}

/// What the pipeline does next after a step finishes
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Invoke another step directly with an optional parameter
    Goto(StepName, Option<Value>),

    /// Issue one external service call, then resume at `then` with
    /// the delivered response
    Call {
        /// The call to issue
        request: ServiceRequest,
        /// Continuation step resumed with the result
        then: StepName,
        /// Optional parameter forwarded to the continuation
        param: Option<Value>,
    },

    /// Resolve the completion gate with the final response
    Finish(Response),
}

impl Transition {
    /// Transition to another step
    pub fn goto(name: impl Into<StepName>) -> Self {
        Transition::Goto(name.into(), None)
    }

    /// Transition to another step with a parameter payload
    pub fn goto_with(name: impl Into<StepName>, param: Value) -> Self {
        Transition::Goto(name.into(), Some(param))
    }

    /// Issue a service call and resume at the named continuation
    pub fn call(request: impl Into<ServiceRequest>, then: impl Into<StepName>) -> Self {
        Transition::Call {
            request: request.into(),
            then: then.into(),
            param: None,
        }
    }

    /// Finish the invocation with the given response
    pub fn finish(response: Response) -> Self {
        Transition::Finish(response)
    }
}

impl From<crate::domain::service::SearchRequest> for ServiceRequest {
    fn from(request: crate::domain::service::SearchRequest) -> Self {
        ServiceRequest::Search(request)
    }
}

impl From<crate::domain::service::InvokeRequest> for ServiceRequest {
    fn from(request: crate::domain::service::InvokeRequest) -> Self {
        ServiceRequest::Invoke(request)
    }
}

impl From<crate::domain::service::LogonRequest> for ServiceRequest {
    fn from(request: crate::domain::service::LogonRequest) -> Self {
        ServiceRequest::Logon(request)
    }
}

/// A named, registered unit of pipeline logic
///
/// Steps are generic over the invocation context type `C`, which carries the
/// typed per-invocation state the steps communicate through.
#[async_trait]
pub trait Step<C: Send + 'static>: Send + Sync {
    /// Human-readable step type, used for logging
    fn step_type(&self) -> &str;

    /// Run the step and decide the next transition
    async fn run(&self, ctx: &mut C, input: StepInput) -> Result<Transition, CoreError>;
}

impl<C: Send + 'static> fmt::Debug for dyn Step<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("step_type", &self.step_type())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::service::LogonRequest;
    use serde_json::json;

    #[test]
    fn test_step_input_direct_has_no_response() {
        let input = StepInput::direct(Some(json!({"scope": "guid"})));
        assert!(input.response().is_err());
        assert_eq!(input.param, Some(json!({"scope": "guid"})));
    }

    #[test]
    fn test_step_input_continuation_carries_response() {
        let input = StepInput::continuation(None, ServiceResponse::ok(json!({"rows": []})));
        let response = input.response().unwrap();
        assert!(!response.status.is_error());
    }

    #[test]
    fn test_transition_helpers() {
        let transition = Transition::goto("app-auth");
        assert_eq!(transition, Transition::Goto(StepName::from("app-auth"), None));

        let transition = Transition::call(
            LogonRequest::new("ada", "secret"),
            "app-auth-logon-process",
        );
        match transition {
            Transition::Call { request, then, param } => {
                assert_eq!(request.kind(), "logon");
                assert_eq!(then, StepName::from("app-auth-logon-process"));
                assert!(param.is_none());
            }
            _ => panic!("Expected Call transition"),
        }
    }
}
