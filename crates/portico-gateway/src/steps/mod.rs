//! The pipeline step set
//!
//! Every step is registered before the pipeline starts; the dispatcher then
//! drives the invocation from `PipelineState::Init` until the respond step
//! finishes it. Recoverable failures are translated where they are detected
//! into a terminal transition through the `util-end` step.

use portico_core::{CoreError, StepRegistry, Transition};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::context::InvocationContext;
use crate::state::{business_continuation, business_step, PipelineState};

pub mod audit;
pub mod auth;
pub mod init;
pub mod process;
pub mod respond;
pub mod start;
pub mod user;

pub use audit::{AuditLogStep, AuditSavedStep, AUDIT_LOG_OBJECT};
pub use auth::{AuthLogonProcessStep, AuthProcessStep, AuthStep};
pub use init::InitStep;
pub use process::{DispatchStep, PersonSearchResponseStep, PersonSearchStep, PERSON_SEARCH_METHOD};
pub use respond::{RespondStep, TerminateStep};
pub use start::StartStep;
pub use user::{UserDetailProcessStep, UserDetailStep, USER_DETAILS_METHOD};

/// Transition into the terminal path with response data and a status code
pub(crate) fn terminate(data: Value, http_status: u16) -> Transition {
    Transition::goto_with(
        PipelineState::Terminate,
        json!({ "data": data, "httpStatus": http_status }),
    )
}

/// Register every pipeline step
///
/// Business operations are registered first so the dispatch step knows the
/// valid method names.
pub fn register_all(
    registry: &mut StepRegistry<InvocationContext>,
    config: &GatewayConfig,
) -> Result<(), CoreError> {
    let mut methods = HashSet::new();

    methods.insert(PERSON_SEARCH_METHOD.to_string());
    registry.register(
        business_step(PERSON_SEARCH_METHOD),
        Arc::new(PersonSearchStep),
    )?;
    registry.register(
        business_continuation(PERSON_SEARCH_METHOD),
        Arc::new(PersonSearchResponseStep),
    )?;

    registry.register(PipelineState::Init, Arc::new(InitStep))?;
    registry.register(PipelineState::Auth, Arc::new(AuthStep))?;
    registry.register(PipelineState::AuthProcess, Arc::new(AuthProcessStep))?;
    registry.register(
        PipelineState::AuthLogonProcess,
        Arc::new(AuthLogonProcessStep),
    )?;
    registry.register(PipelineState::UserDetail, Arc::new(UserDetailStep))?;
    registry.register(
        PipelineState::UserDetailProcess,
        Arc::new(UserDetailProcessStep),
    )?;
    registry.register(PipelineState::Start, Arc::new(StartStep))?;
    registry.register(PipelineState::Dispatch, Arc::new(DispatchStep::new(methods)))?;
    registry.register(
        PipelineState::Terminate,
        Arc::new(TerminateStep::new(config.audit_log)),
    )?;
    registry.register(PipelineState::AuditLog, Arc::new(AuditLogStep))?;
    registry.register(PipelineState::AuditSaved, Arc::new(AuditSavedStep))?;
    registry.register(PipelineState::Respond, Arc::new(RespondStep))?;

    Ok(())
}
