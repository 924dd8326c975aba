//! Backend trait for key-value persistence.
//!
//! This module defines the abstraction layer the template store persists
//! through, allowing different storage implementations (memory, file) to be
//! used interchangeably.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during storage backend operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key contains characters the backend cannot address
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Filesystem operation failed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backend is temporarily unavailable
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A string store addressable by a fixed key.
///
/// Every `set` replaces the previous value for the key entirely. There is no
/// merge and no compare-and-swap: two writers sharing one backend follow
/// last-write-wins.
pub trait KeyValueStore: Send + Sync {
    /// Short identifier used in logs and metrics.
    fn backend_name(&self) -> &'static str;

    /// Read the value stored under `key`, or `None` if nothing was stored.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, overwriting any prior value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// Check that a key only uses `[A-Za-z0-9._-]` and is not a relative path
/// component.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.len() > 128 {
        return Err(StorageError::InvalidKey(
            "key must be 1-128 characters".to_string(),
        ));
    }

    if key == "." || key == ".." {
        return Err(StorageError::InvalidKey(key.to_string()));
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(StorageError::InvalidKey(format!(
            "{key}: only alphanumeric, dash, underscore, or dot allowed"
        )));
    }

    Ok(())
}
