//! Start step: inspect mode and method, short-circuit or route
//!
//! Reflect mode is a diagnostic echo: the response carries the original
//! request body verbatim plus two freshly generated correlation
//! identifiers, and no business logic runs.

use async_trait::async_trait;
use portico_core::{CoreError, Step, StepInput, Transition};
use serde_json::{json, Value};
use tracing::debug;

use crate::context::{contexts, scopes, InvocationContext};
use crate::guid::{correlation_id, CORRELATION_PATTERN};
use crate::mode::Mode;
use crate::state::PipelineState;
use crate::steps::terminate;

/// Routes an invocation after authentication: diagnostic echo or dispatch
pub struct StartStep;

#[async_trait]
impl Step<InvocationContext> for StartStep {
    fn step_type(&self) -> &str {
        "app-start"
    }

    async fn run(
        &self,
        ctx: &mut InvocationContext,
        _input: StepInput,
    ) -> Result<Transition, CoreError> {
        let body = ctx.request()?.body.clone();
        let mode = Mode::normalize(body.get("mode"));

        if !mode.is_reflect() {
            return Ok(Transition::goto(PipelineState::Dispatch));
        }

        debug!(invocation = %ctx.id, "reflect mode, echoing request");

        for context in [contexts::LOG, contexts::AUDIT] {
            ctx.store_mut().set(
                scopes::GUID,
                context,
                json!(correlation_id(CORRELATION_PATTERN)),
            );
        }

        let mut data = mode
            .data
            .as_ref()
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        data.insert("status".to_string(), json!(mode.status));
        if let Some(method) = body.get("method") {
            data.insert("method".to_string(), method.clone());
        }
        data.insert("reflected".to_string(), body);
        data.insert(
            "guids".to_string(),
            Value::Object(ctx.store().scope(scopes::GUID)),
        );

        Ok(terminate(Value::Object(data), 200))
    }
}
