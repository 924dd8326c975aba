//! Storage backend factory

use std::sync::Arc;

use crate::config::StorageConfig;

use super::backend::{KeyValueStore, StorageResult};
use super::file_backend::FileKeyValueStore;
use super::memory_backend::MemoryKeyValueStore;

/// Create a key-value backend based on configuration.
///
/// Returns the appropriate backend implementation based on the `backend` setting:
/// - `"file"`: Returns a `FileKeyValueStore` rooted at `path`
/// - `"memory"`: Returns a `MemoryKeyValueStore`
///
/// Unknown backend names fall back to memory with a warning. Fails only when
/// the file backend cannot create its root directory.
pub fn create_key_value_store(config: &StorageConfig) -> StorageResult<Arc<dyn KeyValueStore>> {
    match config.backend.as_str() {
        "file" => {
            tracing::info!(
                backend = "file",
                path = %config.path.display(),
                "Creating file storage backend"
            );
            Ok(Arc::new(FileKeyValueStore::new(&config.path)?))
        }
        "memory" => {
            tracing::info!(backend = "memory", "Creating memory storage backend");
            Ok(Arc::new(MemoryKeyValueStore::new()))
        }
        other => {
            tracing::warn!(
                backend = %other,
                "Unknown storage backend, falling back to memory"
            );
            Ok(Arc::new(MemoryKeyValueStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend: &str, path: std::path::PathBuf) -> StorageConfig {
        StorageConfig {
            backend: backend.to_string(),
            path,
            ..StorageConfig::default()
        }
    }

    #[test]
    fn test_create_memory_backend() {
        let backend = create_key_value_store(&config("memory", "unused".into())).unwrap();
        assert_eq!(backend.backend_name(), "memory");
    }

    #[test]
    fn test_create_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let backend = create_key_value_store(&config("file", dir.path().to_path_buf())).unwrap();
        assert_eq!(backend.backend_name(), "file");
    }

    #[test]
    fn test_unknown_backend_falls_back_to_memory() {
        let backend = create_key_value_store(&config("redis", "unused".into())).unwrap();
        assert_eq!(backend.backend_name(), "memory");
    }
}
