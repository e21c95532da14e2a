//! Durable key-value storage port interface

use async_trait::async_trait;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to read key '{key}': {message}")]
    ReadFailed { key: String, message: String },

    #[error("Failed to write key '{key}': {message}")]
    WriteFailed { key: String, message: String },

    #[error("Failed to remove key '{key}': {message}")]
    RemoveFailed { key: String, message: String },
}

/// Port for durable key-value storage of opaque records.
///
/// Values are serialized by the caller; the store never interprets them.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, None when the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, overwriting any previous one
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key; removing an absent key is not an error
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
