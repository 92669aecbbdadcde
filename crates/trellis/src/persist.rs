//! Persisted widget state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Capability for saving and restoring a widget's state across sessions.
pub trait Persistable {
    /// Whether this widget takes part in state save/restore.
    fn persistent(&self) -> bool;

    /// Enable or disable state save/restore.
    fn set_persistent(&mut self, value: bool);

    /// Write state under `key`.
    fn save_state(&mut self, key: &str, settings: &mut dyn Settings) -> Result<()>;

    /// Read state stored under `key`.
    fn restore_state(&mut self, key: &str, settings: &dyn Settings) -> Result<()>;
}

/// Key/value store for persisted UI state.
pub trait Settings {
    /// The value stored under `key`.
    fn get(&self, key: &str) -> Option<&Value>;

    /// Store `value` under `key`.
    fn put(&mut self, key: &str, value: Value) -> Result<()>;

    /// Remove the value stored under `key`, returning it.
    fn remove(&mut self, key: &str) -> Option<Value>;
}

/// In-memory settings store that serializes to JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySettings {
    /// Stored values, ordered by key.
    values: BTreeMap<String, Value>,
}

impl MemorySettings {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Encode the store as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a store previously produced by [`MemorySettings::to_json`].
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl Settings for MemorySettings {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn put(&mut self, key: &str, value: Value) -> Result<()> {
        if key.is_empty() {
            return Err(Error::Settings("empty key".into()));
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }
}
