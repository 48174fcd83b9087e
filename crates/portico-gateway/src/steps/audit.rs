//! Audit chain: persist an invocation record before responding
//!
//! Runs only when audit logging is enabled; the respond step is reached
//! either way, and an audit write failure never changes the response
//! already committed to the response slot.

use async_trait::async_trait;
use portico_core::{CoreError, InvokeRequest, Step, StepInput, Transition};
use serde_json::json;
use tracing::{info, warn};

use crate::context::{contexts, scopes, InvocationContext};
use crate::state::PipelineState;

/// Remote object audit records are written to
pub const AUDIT_LOG_OBJECT: &str = "core_debug_log";

/// Writes the invocation record to the audit object
pub struct AuditLogStep;

#[async_trait]
impl Step<InvocationContext> for AuditLogStep {
    fn step_type(&self) -> &str {
        "app-log"
    }

    async fn run(
        &self,
        ctx: &mut InvocationContext,
        _input: StepInput,
    ) -> Result<Transition, CoreError> {
        let record = json!({
            "event": ctx.store().get(scopes::APP, contexts::EVENT),
            "request": ctx.request().ok(),
            "context": ctx.meta(),
            "guids": ctx.store().scope(scopes::GUID),
        });

        let invoke = InvokeRequest::object(
            AUDIT_LOG_OBJECT,
            json!({
                "data": serde_json::to_string(&record)?,
                "notes": format!("invocation {}", ctx.id),
            }),
        );

        Ok(Transition::call(invoke, PipelineState::AuditSaved))
    }
}

/// Notes the audit write outcome and moves on to respond
pub struct AuditSavedStep;

#[async_trait]
impl Step<InvocationContext> for AuditSavedStep {
    fn step_type(&self) -> &str {
        "app-log-saved"
    }

    async fn run(
        &self,
        ctx: &mut InvocationContext,
        input: StepInput,
    ) -> Result<Transition, CoreError> {
        let response = input.response()?;

        if response.status.is_error() {
            warn!(invocation = %ctx.id, "audit record was not saved");
        } else {
            info!(invocation = %ctx.id, "audit record saved");
        }

        Ok(Transition::goto(PipelineState::Respond))
    }
}
