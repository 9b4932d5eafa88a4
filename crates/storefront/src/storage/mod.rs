//! Key-value persistence backends.
//!
//! The cart lives in a single named slot. Backends only move strings; the
//! cart store decides what goes in them.
//!
//! - [`FileStore`] - one JSON file per key under a data directory
//! - [`MemoryStore`] - in-process map for tests and throwaway sessions

use std::fmt::Debug;

use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Underlying filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Backend state was poisoned by a panic in another thread.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A string key-value store.
///
/// Methods take `&self`; backends needing mutation use interior mutability.
pub trait KeyValueStore: Debug {
    /// Read a value. Returns `Ok(None)` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the key is invalid or the read fails.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace a value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the key is invalid or the write fails.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Succeeds even if the key did not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the key is invalid or the delete fails.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Check that a key is safe to use as a file stem.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_owned()))
    }
}
