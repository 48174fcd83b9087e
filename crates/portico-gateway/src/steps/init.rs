//! Init step: derive the request from the stored envelope

use async_trait::async_trait;
use portico_core::{CoreError, Step, StepInput, Transition};
use tracing::debug;

use crate::context::InvocationContext;
use crate::envelope::Request;
use crate::state::PipelineState;

/// Parses the envelope into the read-only request
pub struct InitStep;

#[async_trait]
impl Step<InvocationContext> for InitStep {
    fn step_type(&self) -> &str {
        "app-init"
    }

    async fn run(
        &self,
        ctx: &mut InvocationContext,
        _input: StepInput,
    ) -> Result<Transition, CoreError> {
        let event = ctx.event()?;
        let request = Request::from_envelope(&event)?;
        debug!(invocation = %ctx.id, "request parsed");
        ctx.set_request(request);

        Ok(Transition::goto(PipelineState::Auth))
    }
}
