//! Key-value persistence for quote pools, shown-sets, and translations.
//!
//! Ownership model:
//! - `KeyValueStore` is the backend interface (string blobs keyed by name).
//! - `StoreAdapter` is what the rest of the crate talks to. It never
//!   propagates failures: reads degrade to `None` and writes report
//!   `false` ("not saved").

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};
use tracing::warn;

use crate::errors::QuoteError;
use crate::types::StoreKey;

/// File-backed store implementation.
pub mod file;

pub use file::FileStore;

/// Host-provided persistent string store.
pub trait KeyValueStore: Send + Sync {
    /// Return the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, QuoteError>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), QuoteError>;
    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), QuoteError>;
    /// Live keys in insertion order (oldest first).
    fn keys(&self) -> Result<Vec<StoreKey>, QuoteError>;
}

/// In-memory store with insertion-ordered keys and an optional byte quota.
///
/// The quota counts key and value bytes of all live entries and mimics a
/// browser store rejecting writes once full.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<IndexMap<StoreKey, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes once `quota_bytes` would be exceeded.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(IndexMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Bytes currently used by live entries.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .map(|guard| {
                guard
                    .iter()
                    .map(|(key, value)| key.len() + value.len())
                    .sum()
            })
            .unwrap_or(0)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, QuoteError> {
        let guard = self
            .entries
            .read()
            .map_err(|_| QuoteError::Storage("memory store lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), QuoteError> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| QuoteError::Storage("memory store lock poisoned".into()))?;
        if let Some(limit) = self.quota_bytes {
            let used: usize = guard
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, value)| existing.len() + value.len())
                .sum();
            let needed = used + key.len() + value.len();
            if needed > limit {
                return Err(QuoteError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), QuoteError> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| QuoteError::Storage("memory store lock poisoned".into()))?;
        guard.shift_remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<StoreKey>, QuoteError> {
        let guard = self
            .entries
            .read()
            .map_err(|_| QuoteError::Storage("memory store lock poisoned".into()))?;
        Ok(guard.keys().cloned().collect())
    }
}

/// Failure-swallowing facade over a `KeyValueStore`.
#[derive(Clone)]
pub struct StoreAdapter {
    backend: Arc<dyn KeyValueStore>,
}

impl StoreAdapter {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Adapter over a fresh unbounded `MemoryStore`.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Read a raw value; read failures are logged and treated as missing.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("[quote_galaxy:store] read of '{}' failed: {}", key, err);
                None
            }
        }
    }

    /// Write a raw value. Returns `false` when the value was not saved.
    pub fn set(&self, key: &str, value: &str) -> bool {
        match self.backend.set(key, value) {
            Ok(()) => true,
            Err(err) => {
                warn!("[quote_galaxy:store] could not save '{}': {}", key, err);
                false
            }
        }
    }

    /// Remove a key. Returns `false` when the removal failed.
    pub fn remove(&self, key: &str) -> bool {
        match self.backend.remove(key) {
            Ok(()) => true,
            Err(err) => {
                warn!("[quote_galaxy:store] could not remove '{}': {}", key, err);
                false
            }
        }
    }

    /// Live keys starting with `prefix`, oldest first.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<StoreKey> {
        match self.backend.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter(|key| key.starts_with(prefix))
                .collect(),
            Err(err) => {
                warn!("[quote_galaxy:store] key listing failed: {}", err);
                Vec::new()
            }
        }
    }

    /// Read and decode a JSON value; missing or corrupt values yield `None`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("[quote_galaxy:store] ignoring corrupt value at '{}': {}", key, err);
                None
            }
        }
    }

    /// Encode and write a JSON value. Returns `false` when the value was not saved.
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, &raw),
            Err(err) => {
                warn!("[quote_galaxy:store] could not encode '{}': {}", key, err);
                false
            }
        }
    }
}
