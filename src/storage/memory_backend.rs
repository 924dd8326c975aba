//! In-memory key-value backend using DashMap.
//!
//! Values are lost when the process exits. Useful for tests and for running
//! without touching the filesystem.

use dashmap::DashMap;

use super::backend::{KeyValueStore, StorageResult};

/// In-memory key-value backend.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: DashMap<String, String>,
}

impl MemoryKeyValueStore {
    /// Create an empty memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory backend pre-populated with one value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.values.insert(key.into(), value.into());
        store
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.values.insert(key.to_string(), value.to_string());

        tracing::trace!(key = %key, bytes = value.len(), "Stored value in memory backend");
        Ok(())
    }
}
