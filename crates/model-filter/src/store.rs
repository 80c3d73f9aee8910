//! Session-like state storage.
//!
//! Filter form data outlives a single request, so it is kept in a
//! session-scoped key-value store owned by the host application. The
//! [`StateStore`] trait is the seam to that store; [`MemoryStore`] is an
//! in-process implementation for tests and single-process tools.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

/// Abstraction over a session-scoped key-value store.
///
/// Methods take `&self` so one store can back several engines at once.
/// Implementations are expected to be last-write-wins; the engine does no
/// locking around its read-modify-write cycles.
pub trait StateStore {
    /// Returns `true` if a value is stored under `key`.
    fn has(&self, key: &str) -> bool;

    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value);
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) {
        (**self).set(key, value)
    }
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) {
        (**self).set(key, value)
    }
}

/// In-memory [`StateStore`].
///
/// # Example
///
/// ```
/// use model_filter::{MemoryStore, StateStore};
/// use serde_json::json;
///
/// let store = MemoryStore::new();
/// assert!(!store.has("flash"));
///
/// store.set("flash", json!({"notice": "saved"}));
/// assert_eq!(store.get("flash"), Some(json!({"notice": "saved"})));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a value.
    pub fn with_value(self, key: impl Into<String>, value: Value) -> Self {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.into(), value);
        self
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every stored value, like ending a session.
    pub fn clear(&self) {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl StateStore for MemoryStore {
    fn has(&self, key: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(!store.has("missing"));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn set_replaces() {
        let store = MemoryStore::new();
        store.set("k", json!(1));
        store.set("k", json!({"a": 2}));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k"), Some(json!({"a": 2})));
    }

    #[test]
    fn with_value_prepopulates() {
        let store = MemoryStore::new().with_value("k", json!("v"));
        assert!(store.has("k"));
    }

    #[test]
    fn clear_empties() {
        let store = MemoryStore::new().with_value("k", json!("v"));
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn shared_through_references() {
        let store = Arc::new(MemoryStore::new());
        let by_ref: &MemoryStore = &store;

        by_ref.set("k", json!(true));
        assert!(StateStore::has(&store, "k"));
    }
}
