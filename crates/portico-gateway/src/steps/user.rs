//! User-detail chain: fetch and store the caller's profile

use async_trait::async_trait;
use portico_core::{CoreError, InvokeRequest, Step, StepInput, Transition};

use crate::context::InvocationContext;
use crate::identity::Identity;
use crate::state::PipelineState;

/// Remote method returning the authenticated caller's profile
pub const USER_DETAILS_METHOD: &str = "core_get_user_details";

/// Fetches the full user-detail record
pub struct UserDetailStep;

#[async_trait]
impl Step<InvocationContext> for UserDetailStep {
    fn step_type(&self) -> &str {
        "app-user"
    }

    async fn run(
        &self,
        _ctx: &mut InvocationContext,
        _input: StepInput,
    ) -> Result<Transition, CoreError> {
        Ok(Transition::call(
            InvokeRequest::method(USER_DETAILS_METHOD),
            PipelineState::UserDetailProcess,
        ))
    }
}

/// Stores the user-detail record as the final identity stage
pub struct UserDetailProcessStep;

#[async_trait]
impl Step<InvocationContext> for UserDetailProcessStep {
    fn step_type(&self) -> &str {
        "app-user-process"
    }

    async fn run(
        &self,
        ctx: &mut InvocationContext,
        input: StepInput,
    ) -> Result<Transition, CoreError> {
        let response = input.response()?;
        ctx.set_identity(Identity::Profile(response.clone()));

        Ok(Transition::goto(PipelineState::Start))
    }
}
