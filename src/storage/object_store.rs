//! Object Store Abstraction
//!
//! The host keeps one opaque object per key and the station manager
//! overwrites it wholesale on every save.
//!
//! Implementations:
//! - `InMemoryObjectStore`: For unit tests and DST
//! - `LocalFsObjectStore`: One file per key under a data directory

use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{Error as IoError, ErrorKind, Result as IoResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Error type for object store operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Object not found
    #[error("Object not found: {0}")]
    NotFound(String),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[source] IoError),
    /// Stored bytes could not be decoded
    #[error("Corrupt object '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// Aggregate could not be encoded
    #[error("Failed to encode object '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<IoError> for StorageError {
    fn from(e: IoError) -> Self {
        match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(e.to_string()),
            _ => StorageError::Io(e),
        }
    }
}

/// Object store abstraction trait.
///
/// Calls are synchronous: the host runs command handlers one at a time and
/// treats a save as complete when the call returns.
pub trait ObjectStore: Send + Sync + 'static {
    /// Put an object (create or overwrite)
    fn put(&self, key: &str, data: &[u8]) -> IoResult<()>;

    /// Get an object's contents
    fn get(&self, key: &str) -> IoResult<Vec<u8>>;

    /// Check if an object exists
    fn exists(&self, key: &str) -> IoResult<bool>;

    /// Delete an object (deleting a missing key is not an error)
    fn delete(&self, key: &str) -> IoResult<()>;
}

// ============================================================================
// InMemoryObjectStore - For tests and DST
// ============================================================================

/// In-memory object store for unit tests and deterministic simulation.
///
/// Clones share the same backing map, so a test can keep a handle and
/// inspect what the manager saved.
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectStore {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    puts: Arc<RwLock<u64>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Total number of successful `put` calls
    pub fn put_count(&self) -> u64 {
        *self.puts.read()
    }

    /// Store raw bytes directly (for seeding corrupt or legacy objects)
    pub fn insert_raw(&self, key: &str, data: impl Into<Vec<u8>>) {
        self.data.write().insert(key.to_string(), data.into());
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn put(&self, key: &str, data: &[u8]) -> IoResult<()> {
        self.data.write().insert(key.to_string(), data.to_vec());
        *self.puts.write() += 1;
        Ok(())
    }

    fn get(&self, key: &str) -> IoResult<Vec<u8>> {
        self.data
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| IoError::new(ErrorKind::NotFound, format!("Key not found: {}", key)))
    }

    fn exists(&self, key: &str) -> IoResult<bool> {
        Ok(self.data.read().contains_key(key))
    }

    fn delete(&self, key: &str) -> IoResult<()> {
        self.data.write().remove(key);
        Ok(())
    }
}

// ============================================================================
// LocalFsObjectStore - One file per key
// ============================================================================

/// Local filesystem object store
#[derive(Debug, Clone)]
pub struct LocalFsObjectStore {
    base_path: PathBuf,
}

impl LocalFsObjectStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        LocalFsObjectStore {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }

    fn ensure_parent(path: &Path) -> IoResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl ObjectStore for LocalFsObjectStore {
    /// Writes to a sibling temp file and renames it over the target, so a
    /// crash mid-write never leaves a truncated object behind.
    fn put(&self, key: &str, data: &[u8]) -> IoResult<()> {
        let path = self.full_path(key);
        Self::ensure_parent(&path)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &path)
    }

    fn get(&self, key: &str) -> IoResult<Vec<u8>> {
        std::fs::read(self.full_path(key))
    }

    fn exists(&self, key: &str) -> IoResult<bool> {
        Ok(self.full_path(key).exists())
    }

    fn delete(&self, key: &str) -> IoResult<()> {
        match std::fs::remove_file(self.full_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()), // Already deleted
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_put_get() {
        let store = InMemoryObjectStore::new();
        store.put("stations.json", b"{}").unwrap();

        assert_eq!(store.get("stations.json").unwrap(), b"{}");
        assert!(store.exists("stations.json").unwrap());
        assert_eq!(store.put_count(), 1);
    }

    #[test]
    fn test_in_memory_missing_key() {
        let store = InMemoryObjectStore::new();
        let err = store.get("missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_in_memory_clones_share_state() {
        let store = InMemoryObjectStore::new();
        let handle = store.clone();
        store.put("a", b"1").unwrap();
        assert_eq!(handle.get("a").unwrap(), b"1");

        handle.delete("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_local_fs_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFsObjectStore::new(dir.path().join("nested"));

        store.put("data.json", b"first").unwrap();
        store.put("data.json", b"second").unwrap();

        assert_eq!(store.get("data.json").unwrap(), b"second");
        assert!(!dir.path().join("nested").join("data.tmp").exists());
    }

    #[test]
    fn test_local_fs_delete_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFsObjectStore::new(dir.path());
        assert!(store.delete("nothing.json").is_ok());
        assert!(!store.exists("nothing.json").unwrap());
    }

    #[test]
    fn test_storage_error_from_io() {
        let err: StorageError = IoError::new(ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, StorageError::NotFound(_)));

        let err: StorageError = IoError::new(ErrorKind::Other, "disk").into();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
