//! Portico gateway: a single-request orchestration pipeline
//!
//! One inbound serverless event is authenticated against the business-object
//! service, routed to a business operation, and answered with exactly one
//! HTTP response. The pipeline is a set of named steps driven by the
//! dispatcher in `portico-core`; this crate supplies the steps, the typed
//! per-invocation context, and the gateway entry point.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod guid;
pub mod identity;
pub mod mode;
pub mod state;
pub mod steps;
pub mod util;

pub use config::GatewayConfig;
pub use context::InvocationContext;
pub use envelope::{Envelope, Request};
pub use error::GatewayError;
pub use identity::Identity;
pub use mode::Mode;
pub use state::PipelineState;

use portico_core::{Dispatcher, HttpResponse, ServiceClient, StepRegistry};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// The gateway: a populated pipeline bound to a service client
///
/// Construct once, then call [`Gateway::handle`] per invocation. Each
/// invocation gets its own context; the gateway itself is immutable and
/// shareable.
pub struct Gateway {
    dispatcher: Dispatcher<InvocationContext>,
}

impl Gateway {
    /// Build the gateway: register every pipeline step and bind the client
    pub fn new(
        config: &GatewayConfig,
        client: Arc<dyn ServiceClient>,
    ) -> Result<Self, GatewayError> {
        let mut registry = StepRegistry::new();
        steps::register_all(&mut registry, config)?;

        Ok(Self {
            dispatcher: Dispatcher::new(registry, client),
        })
    }

    /// Handle one invocation from its raw envelope and opaque metadata
    ///
    /// Recoverable failures have already been shaped into terminal responses
    /// by the steps; anything that escapes here is unrecoverable and becomes
    /// an opaque 500.
    pub async fn handle(&self, event: Envelope, meta: Value) -> HttpResponse {
        let mut ctx = InvocationContext::new(event, meta);
        let invocation = ctx.id;
        info!(%invocation, "invocation started");

        match self.dispatcher.run(&mut ctx, PipelineState::Init).await {
            Ok(response) => {
                info!(%invocation, status = response.status_code, "invocation finished");
                response
            }
            Err(err) => {
                error!(%invocation, error = %err, "invocation failed");
                HttpResponse {
                    status_code: 500,
                    headers: HashMap::new(),
                    body: r#"{"error":"Internal server error."}"#.to_string(),
                }
            }
        }
    }
}
