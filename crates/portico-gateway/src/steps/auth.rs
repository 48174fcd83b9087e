//! Authentication chain
//!
//! Three steps: look the caller up by API key, validate the lookup and
//! start the second-factor logon, then validate the logon result. Every
//! failure is reported as a 401 terminal response; nothing is retried.

use async_trait::async_trait;
use portico_core::{
    CoreError, Field, Filter, LogonRequest, SearchRequest, Step, StepInput, Transition,
};
use serde_json::json;
use tracing::warn;

use crate::context::InvocationContext;
use crate::identity::Identity;
use crate::state::PipelineState;
use crate::steps::terminate;
use crate::util::clean;

/// Remote object holding the identities the API key is matched against
pub const USER_OBJECT: &str = "setup_user";

/// Issues the identity lookup for the caller-supplied API key
pub struct AuthStep;

#[async_trait]
impl Step<InvocationContext> for AuthStep {
    fn step_type(&self) -> &str {
        "app-auth"
    }

    async fn run(
        &self,
        ctx: &mut InvocationContext,
        _input: StepInput,
    ) -> Result<Transition, CoreError> {
        let apikey = ctx.request()?.apikey();

        let search = SearchRequest::new(USER_OBJECT)
            .with_fields([Field::new("username")])
            .with_filters([Filter::equals("guid", apikey)]);

        Ok(Transition::call(search, PipelineState::AuthProcess))
    }
}

/// Validates the lookup result and starts the second-factor logon
pub struct AuthProcessStep;

#[async_trait]
impl Step<InvocationContext> for AuthProcessStep {
    fn step_type(&self) -> &str {
        "app-auth-process"
    }

    async fn run(
        &self,
        ctx: &mut InvocationContext,
        input: StepInput,
    ) -> Result<Transition, CoreError> {
        let response = input.response()?.clone();
        ctx.set_identity(Identity::Lookup(response.clone()));

        if response.status.is_error() {
            warn!(invocation = %ctx.id, "identity lookup failed");
            return Ok(terminate(
                json!({ "error": "Error processing user authentication." }),
                401,
            ));
        }

        let username = match response.first_row() {
            Some(row) => clean(row.get("username")),
            None => {
                let apikey = ctx.request()?.apikey();
                warn!(invocation = %ctx.id, "no identity matched the api key");
                return Ok(terminate(
                    json!({ "error": format!("Bad apikey [{apikey}]") }),
                    401,
                ));
            }
        };

        let authkey = ctx.request()?.authkey();
        Ok(Transition::call(
            LogonRequest::new(username, authkey),
            PipelineState::AuthLogonProcess,
        ))
    }
}

/// Validates the logon result and stores the session identity
pub struct AuthLogonProcessStep;

#[async_trait]
impl Step<InvocationContext> for AuthLogonProcessStep {
    fn step_type(&self) -> &str {
        "app-auth-logon-process"
    }

    async fn run(
        &self,
        ctx: &mut InvocationContext,
        input: StepInput,
    ) -> Result<Transition, CoreError> {
        let response = input.response()?;

        if response.status.is_error() {
            let authkey = ctx.request()?.authkey();
            warn!(invocation = %ctx.id, "second-factor logon failed");
            return Ok(terminate(
                json!({ "error": format!("Bad authkey [{authkey}]") }),
                401,
            ));
        }

        ctx.set_identity(Identity::Session(response.clone()));
        Ok(Transition::goto(PipelineState::UserDetail))
    }
}
