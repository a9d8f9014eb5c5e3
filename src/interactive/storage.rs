//! In-memory `localStorage` and JSON-backed persisted state.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::warn;

/// String key/value store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn set_item(&self, key: &str, value: impl Into<String>) {
        self.entries.borrow_mut().insert(key.to_string(), value.into());
    }

    pub fn remove_item(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Parse the JSON stored under `key`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "ignoring unparseable storage entry");
                None
            }
        }
    }
}

/// A value mirrored to storage as JSON: read once on creation, written on
/// every update.
#[derive(Debug, Clone)]
pub struct PersistedState<T> {
    storage: LocalStorage,
    key: String,
    value: T,
}

impl<T: Serialize + DeserializeOwned> PersistedState<T> {
    pub fn new(storage: LocalStorage, key: impl Into<String>, initial: T) -> Self {
        let key = key.into();
        let value = storage.get_json(&key).unwrap_or(initial);
        PersistedState {
            storage,
            key,
            value,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.write();
    }

    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.value);
        self.write();
    }

    fn write(&self) {
        match serde_json::to_string(&self.value) {
            Ok(json) => self.storage.set_item(&self.key, json),
            Err(err) => warn!(key = %self.key, error = %err, "failed to persist state"),
        }
    }
}
