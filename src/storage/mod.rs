//! Key-value persistence for the template collection.
//!
//! The template store only ever reads and writes one value under one key;
//! backends decide where that value lives.

mod backend;
mod factory;
mod file_backend;
mod memory_backend;

pub use backend::{validate_key, KeyValueStore, StorageError, StorageResult};
pub use factory::create_key_value_store;
pub use file_backend::FileKeyValueStore;
pub use memory_backend::MemoryKeyValueStore;
