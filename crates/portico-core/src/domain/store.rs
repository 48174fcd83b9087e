//! Scoped state store for a single invocation
//!
//! The store is a two-level key space addressed by a (scope, context) pair.
//! It is owned by exactly one invocation and steps never run concurrently,
//! so it is a plain owned map with no synchronization.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Per-invocation scoped key/value store
///
/// A write to a (scope, context) pair fully replaces any prior value. A read
/// of an unset pair yields `None`, which callers treat as a distinct,
/// checkable state rather than an error.
#[derive(Debug, Default)]
pub struct ScopedStore {
    scopes: HashMap<String, HashMap<String, Value>>,
}

impl ScopedStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under (scope, context), replacing any existing entry
    pub fn set(&mut self, scope: impl Into<String>, context: impl Into<String>, value: Value) {
        self.scopes
            .entry(scope.into())
            .or_default()
            .insert(context.into(), value);
    }

    /// Get the value stored under (scope, context), if any
    pub fn get(&self, scope: &str, context: &str) -> Option<&Value> {
        self.scopes.get(scope).and_then(|s| s.get(context))
    }

    /// Get the full context-to-value mapping under a scope
    ///
    /// An unknown scope yields an empty mapping. Used to collect values
    /// generated under a shared scope, e.g. correlation identifiers under
    /// scope "guid".
    pub fn scope(&self, scope: &str) -> Map<String, Value> {
        let mut out = Map::new();
        if let Some(contexts) = self.scopes.get(scope) {
            for (context, value) in contexts {
                out.insert(context.clone(), value.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let mut store = ScopedStore::new();
        store.set("app", "request", json!({"body": {}}));

        assert_eq!(store.get("app", "request"), Some(&json!({"body": {}})));
    }

    #[test]
    fn test_unset_pair_is_absent_not_error() {
        let store = ScopedStore::new();
        assert!(store.get("app", "response").is_none());
        assert!(store.scope("guid").is_empty());
    }

    #[test]
    fn test_write_replaces_prior_value() {
        let mut store = ScopedStore::new();
        store.set("app", "user", json!({"status": "OK", "rows": []}));
        store.set("app", "user", json!({"status": "OK", "logon": "ada"}));

        assert_eq!(
            store.get("app", "user"),
            Some(&json!({"status": "OK", "logon": "ada"}))
        );
    }

    #[test]
    fn test_scope_collects_all_contexts() {
        let mut store = ScopedStore::new();
        store.set("guid", "log", json!("id-1"));
        store.set("guid", "audit", json!("id-2"));

        let guids = store.scope("guid");
        assert_eq!(guids.len(), 2);
        assert_eq!(guids["log"], json!("id-1"));
        assert_eq!(guids["audit"], json!("id-2"));
    }
}
