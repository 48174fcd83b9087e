//! Per-invocation context
//!
//! The typed context steps communicate through: the parsed request, the
//! staged identity, and the single-write response slot, layered over a
//! scoped store that keeps the raw envelope, the invocation metadata and
//! generated correlation identifiers.

use portico_core::{CoreError, Response, ScopedStore};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::envelope::{Envelope, Request};
use crate::identity::Identity;

/// Store scopes used by the pipeline
pub mod scopes {
    /// Application scope: raw event and invocation metadata
    pub const APP: &str = "app";
    /// Correlation identifiers generated during the invocation
    pub const GUID: &str = "guid";
}

/// Store contexts used by the pipeline
pub mod contexts {
    /// Raw invocation envelope
    pub const EVENT: &str = "event";
    /// Opaque invocation metadata
    pub const CONTEXT: &str = "context";
    /// Correlation identifier for log records
    pub const LOG: &str = "log";
    /// Correlation identifier for audit records
    pub const AUDIT: &str = "audit";
}

/// State owned by exactly one invocation, discarded when it completes
#[derive(Debug)]
pub struct InvocationContext {
    /// Unique identifier of this invocation
    pub id: Uuid,

    store: ScopedStore,
    request: Option<Request>,
    identity: Option<Identity>,
    response: Option<Response>,
}

impl InvocationContext {
    /// Create the context for one invocation, storing the raw envelope and
    /// the opaque invocation metadata
    pub fn new(event: Envelope, meta: Value) -> Self {
        let mut store = ScopedStore::new();
        store.set(
            scopes::APP,
            contexts::EVENT,
            serde_json::to_value(&event).unwrap_or(Value::Null),
        );
        store.set(scopes::APP, contexts::CONTEXT, meta);

        Self {
            id: Uuid::new_v4(),
            store,
            request: None,
            identity: None,
            response: None,
        }
    }

    /// The raw envelope this invocation was started with
    pub fn event(&self) -> Result<Envelope, CoreError> {
        let value = self
            .store
            .get(scopes::APP, contexts::EVENT)
            .cloned()
            .ok_or_else(|| CoreError::StateStoreError("event not stored".to_string()))?;
        Ok(serde_json::from_value(value)?)
    }

    /// The opaque invocation metadata
    pub fn meta(&self) -> Value {
        self.store
            .get(scopes::APP, contexts::CONTEXT)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// The scoped store
    pub fn store(&self) -> &ScopedStore {
        &self.store
    }

    /// The scoped store, mutably
    pub fn store_mut(&mut self) -> &mut ScopedStore {
        &mut self.store
    }

    /// Record the parsed request
    pub fn set_request(&mut self, request: Request) {
        self.request = Some(request);
    }

    /// The parsed request; an error before the init step has run
    pub fn request(&self) -> Result<&Request, CoreError> {
        self.request
            .as_ref()
            .ok_or_else(|| CoreError::StateStoreError("request not initialised".to_string()))
    }

    /// Replace the identity slot with the next stage
    pub fn set_identity(&mut self, identity: Identity) {
        debug!(invocation = %self.id, stage = identity.stage(), "identity updated");
        self.identity = Some(identity);
    }

    /// The current identity stage, if any
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Write the terminal response; writing twice is store corruption
    pub fn set_response(&mut self, response: Response) -> Result<(), CoreError> {
        if self.response.is_some() {
            return Err(CoreError::StateStoreError(
                "response already written".to_string(),
            ));
        }
        self.response = Some(response);
        Ok(())
    }

    /// Take the terminal response out of its slot
    pub fn take_response(&mut self) -> Result<Response, CoreError> {
        self.response
            .take()
            .ok_or_else(|| CoreError::StateStoreError("response not written".to_string()))
    }
}
