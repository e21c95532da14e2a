//! File-backed key-value store adapter
//!
//! One file per key under an application data directory, XDG-compliant by
//! default. Values are opaque to the store; the session controller keeps
//! JSON in them.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{KeyValueStore, StorageError};

/// Durable key-value store over flat files
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store under the platform data directory
    pub fn new() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("voicenote")
            .join("state");
        Self { dir }
    }

    /// Create with a custom directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Keys may contain dots; everything else unexpected is rejected so a
    /// key can never escape the store directory.
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let safe = key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if key.is_empty() || !safe {
            return Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: "invalid key".to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::WriteFailed {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        // Write-then-rename so a crash mid-write never corrupts the record
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .await
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::RemoveFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn round_trip_and_overwrite() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::with_dir(dir.path());

        assert_eq!(store.get("recording.draft").await.unwrap(), None);
        store.set("recording.draft", "{\"a\":1}").await.unwrap();
        assert_eq!(
            store.get("recording.draft").await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        store.set("recording.draft", "{\"a\":2}").await.unwrap();
        assert_eq!(
            store.get("recording.draft").await.unwrap().as_deref(),
            Some("{\"a\":2}")
        );
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::with_dir(dir.path());

        store.set("k", "v").await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn path_traversal_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::with_dir(dir.path());

        assert!(store.get("../escape").await.is_err());
        assert!(store.set("a/b", "v").await.is_err());
        assert!(store.set("", "v").await.is_err());
    }
}
