//! Pipeline states
//!
//! The pipeline's control flow is an explicit enumeration of states, each
//! mapped onto a registered step name. Business operations are dispatched by
//! the method string in the request, so their step names are derived rather
//! than enumerated.

use portico_core::StepName;

/// The states of the request-processing pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Parse the envelope into the request
    Init,
    /// Look up the caller by API key
    Auth,
    /// Validate the lookup and start the second-factor logon
    AuthProcess,
    /// Validate the logon result
    AuthLogonProcess,
    /// Fetch the caller's profile
    UserDetail,
    /// Store the profile
    UserDetailProcess,
    /// Inspect mode and method; short-circuit or route
    Start,
    /// Route to a business operation
    Dispatch,
    /// Write the terminal response into its slot
    Terminate,
    /// Write the audit-log record
    AuditLog,
    /// Acknowledge the audit-log write
    AuditSaved,
    /// Shape and deliver the final HTTP response
    Respond,
}

impl PipelineState {
    /// The registered step name of this state
    pub fn step_name(self) -> &'static str {
        match self {
            PipelineState::Init => "app-init",
            PipelineState::Auth => "app-auth",
            PipelineState::AuthProcess => "app-auth-process",
            PipelineState::AuthLogonProcess => "app-auth-logon-process",
            PipelineState::UserDetail => "app-user",
            PipelineState::UserDetailProcess => "app-user-process",
            PipelineState::Start => "app-start",
            PipelineState::Dispatch => "app-process",
            PipelineState::Terminate => "util-end",
            PipelineState::AuditLog => "app-log",
            PipelineState::AuditSaved => "app-log-saved",
            PipelineState::Respond => "app-respond",
        }
    }
}

impl From<PipelineState> for StepName {
    fn from(state: PipelineState) -> Self {
        StepName::from(state.step_name())
    }
}

/// Step name of a business operation
pub fn business_step(method: &str) -> StepName {
    StepName(format!("app-process-{method}"))
}

/// Step name of a business operation's continuation
pub fn business_continuation(method: &str) -> StepName {
    StepName(format!("app-process-{method}-response"))
}
