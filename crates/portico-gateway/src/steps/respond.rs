//! Terminal path: commit the response, then finish the invocation
//!
//! Every path through the pipeline converges on the terminate step with a
//! response payload. It commits the payload to the single-write response
//! slot and routes through the audit chain when auditing is enabled; the
//! respond step then takes the committed response and finishes.

use async_trait::async_trait;
use portico_core::{CoreError, Response, Step, StepInput, Transition};
use tracing::debug;

use crate::context::InvocationContext;
use crate::state::PipelineState;

/// Commits the terminal response and routes toward respond
pub struct TerminateStep {
    audit: bool,
}

impl TerminateStep {
    /// Create a terminate step; `audit` decides whether the audit chain runs
    pub fn new(audit: bool) -> Self {
        Self { audit }
    }
}

#[async_trait]
impl Step<InvocationContext> for TerminateStep {
    fn step_type(&self) -> &str {
        "util-end"
    }

    async fn run(
        &self,
        ctx: &mut InvocationContext,
        input: StepInput,
    ) -> Result<Transition, CoreError> {
        let response = match input.param {
            Some(param) => serde_json::from_value::<Response>(param)?,
            None => Response::default(),
        };

        debug!(invocation = %ctx.id, status = response.http_status, "response committed");
        ctx.set_response(response)?;

        if self.audit {
            Ok(Transition::goto(PipelineState::AuditLog))
        } else {
            Ok(Transition::goto(PipelineState::Respond))
        }
    }
}

/// Takes the committed response and finishes the invocation
pub struct RespondStep;

#[async_trait]
impl Step<InvocationContext> for RespondStep {
    fn step_type(&self) -> &str {
        "app-respond"
    }

    async fn run(
        &self,
        ctx: &mut InvocationContext,
        _input: StepInput,
    ) -> Result<Transition, CoreError> {
        let response = ctx.take_response()?;
        Ok(Transition::finish(response))
    }
}
