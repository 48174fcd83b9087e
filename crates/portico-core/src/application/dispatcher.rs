//! Step registry and dispatcher
//!
//! The registry maps step names to handlers; it is populated before the
//! pipeline starts and never mutates afterwards. The dispatcher drives one
//! invocation: it invokes the starting step, follows `Goto` transitions,
//! resolves `Call` transitions against the service client (resuming the
//! named continuation with the delivered response), and fires the completion
//! gate exactly once on `Finish`.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::application::completion::CompletionGate;
use crate::domain::service::ServiceClient;
use crate::domain::step::{Step, StepInput, StepName, Transition};
use crate::{CoreError, HttpResponse};

/// Mapping from step name to executable step logic
pub struct StepRegistry<C> {
    steps: HashMap<StepName, Arc<dyn Step<C>>>,
}

impl<C: Send + 'static> StepRegistry<C> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            steps: HashMap::new(),
        }
    }

    /// Register a step under a name
    ///
    /// Registering a name twice is a programming error and fails fast
    /// rather than silently replacing the earlier step.
    pub fn register(
        &mut self,
        name: impl Into<StepName>,
        step: Arc<dyn Step<C>>,
    ) -> Result<(), CoreError> {
        let name = name.into();
        if self.steps.contains_key(&name) {
            return Err(CoreError::DuplicateStep(name.0));
        }
        debug!(step = %name, step_type = step.step_type(), "registered step");
        self.steps.insert(name, step);
        Ok(())
    }

    /// Whether a step is registered under the name
    pub fn contains(&self, name: &StepName) -> bool {
        self.steps.contains_key(name)
    }

    /// Look up a step by name
    pub fn get(&self, name: &StepName) -> Result<Arc<dyn Step<C>>, CoreError> {
        self.steps
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::UnknownStep(name.0.clone()))
    }

    /// Number of registered steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<C: Send + 'static> Default for StepRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// One pending step invocation inside the transition loop
struct Invocation {
    name: StepName,
    input: StepInput,
}

/// Drives a single invocation through its registered steps
pub struct Dispatcher<C> {
    registry: StepRegistry<C>,
    client: Arc<dyn ServiceClient>,
}

impl<C: Send + 'static> Dispatcher<C> {
    /// Create a dispatcher over a populated registry and a service client
    pub fn new(registry: StepRegistry<C>, client: Arc<dyn ServiceClient>) -> Self {
        Self { registry, client }
    }

    /// The underlying registry
    pub fn registry(&self) -> &StepRegistry<C> {
        &self.registry
    }

    /// Run the pipeline from the starting step until it finishes
    ///
    /// Errors returned here are unrecoverable (unknown step, store
    /// corruption, gate violation); every recoverable condition has already
    /// been translated into a terminal response by the step that detected
    /// it. Steps execute one at a time; each issues at most one service
    /// call before yielding, so there is no reordering hazard.
    pub async fn run(
        &self,
        ctx: &mut C,
        start: impl Into<StepName>,
    ) -> Result<HttpResponse, CoreError> {
        let mut gate = CompletionGate::new();
        let mut pending = Invocation {
            name: start.into(),
            input: StepInput::direct(None),
        };

        loop {
            let step = self.registry.get(&pending.name)?;
            debug!(step = %pending.name, "invoking step");

            match step.run(ctx, pending.input).await? {
                Transition::Goto(name, param) => {
                    pending = Invocation {
                        name,
                        input: StepInput::direct(param),
                    };
                }
                Transition::Call {
                    request,
                    then,
                    param,
                } => {
                    debug!(step = %then, kind = request.kind(), "issuing service call");
                    let response = self.client.call(request).await?;
                    pending = Invocation {
                        name: then,
                        input: StepInput::continuation(param, response),
                    };
                }
                Transition::Finish(response) => {
                    gate.resolve(response.into_http()?)?;
                    break;
                }
            }
        }

        gate.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::service::{
        InvokeRequest, LogonRequest, SearchRequest, ServiceResponse,
    };
    use crate::Response;
    use async_trait::async_trait;
    use serde_json::json;

    #[derive(Default)]
    struct Counter {
        visits: Vec<String>,
    }

    struct GotoStep {
        next: &'static str,
    }

    #[async_trait]
    impl Step<Counter> for GotoStep {
        fn step_type(&self) -> &str {
            "goto"
        }

        async fn run(
            &self,
            ctx: &mut Counter,
            _input: StepInput,
        ) -> Result<Transition, CoreError> {
            ctx.visits.push(self.next.to_string());
            Ok(Transition::goto(self.next))
        }
    }

    struct CallStep;

    #[async_trait]
    impl Step<Counter> for CallStep {
        fn step_type(&self) -> &str {
            "call"
        }

        async fn run(
            &self,
            ctx: &mut Counter,
            _input: StepInput,
        ) -> Result<Transition, CoreError> {
            ctx.visits.push("call".to_string());
            Ok(Transition::call(
                LogonRequest::new("ada", "secret"),
                "finish",
            ))
        }
    }

    struct FinishStep;

    #[async_trait]
    impl Step<Counter> for FinishStep {
        fn step_type(&self) -> &str {
            "finish"
        }

        async fn run(
            &self,
            ctx: &mut Counter,
            input: StepInput,
        ) -> Result<Transition, CoreError> {
            ctx.visits.push("finish".to_string());
            let status = input.response()?.status;
            let data = json!({ "failed": status.is_error() });
            Ok(Transition::finish(Response::ok(data)))
        }
    }

    struct StubClient;

    #[async_trait]
    impl ServiceClient for StubClient {
        async fn search(&self, _request: SearchRequest) -> Result<ServiceResponse, CoreError> {
            Ok(ServiceResponse::ok(json!({"rows": []})))
        }

        async fn invoke(&self, _request: InvokeRequest) -> Result<ServiceResponse, CoreError> {
            Ok(ServiceResponse::ok(json!({})))
        }

        async fn logon(&self, _request: LogonRequest) -> Result<ServiceResponse, CoreError> {
            Ok(ServiceResponse::ok(json!({"logon": "ada"})))
        }
    }

    #[test]
    fn test_duplicate_registration_fails_fast() {
        let mut registry: StepRegistry<Counter> = StepRegistry::new();
        registry
            .register("app-init", Arc::new(FinishStep))
            .unwrap();

        let err = registry
            .register("app-init", Arc::new(FinishStep))
            .unwrap_err();
        assert_eq!(err, CoreError::DuplicateStep("app-init".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_step_lookup() {
        let registry: StepRegistry<Counter> = StepRegistry::new();
        let err = registry.get(&StepName::from("app-missing")).unwrap_err();
        assert_eq!(err, CoreError::UnknownStep("app-missing".to_string()));
    }

    #[tokio::test]
    async fn test_run_follows_transitions_and_resolves_once() {
        let mut registry: StepRegistry<Counter> = StepRegistry::new();
        registry
            .register("start", Arc::new(GotoStep { next: "call" }))
            .unwrap();
        registry.register("call", Arc::new(CallStep)).unwrap();
        registry.register("finish", Arc::new(FinishStep)).unwrap();

        let dispatcher = Dispatcher::new(registry, Arc::new(StubClient));
        let mut ctx = Counter::default();

        let response = dispatcher.run(&mut ctx, "start").await.unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, r#"{"failed":false}"#);
        assert_eq!(ctx.visits, vec!["call", "call", "finish"]);
    }

    #[tokio::test]
    async fn test_run_aborts_on_unknown_step() {
        let mut registry: StepRegistry<Counter> = StepRegistry::new();
        registry
            .register("start", Arc::new(GotoStep { next: "nowhere" }))
            .unwrap();

        let dispatcher = Dispatcher::new(registry, Arc::new(StubClient));
        let mut ctx = Counter::default();

        let err = dispatcher.run(&mut ctx, "start").await.unwrap_err();
        assert_eq!(err, CoreError::UnknownStep("nowhere".to_string()));
    }
}
