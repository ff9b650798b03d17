//! Durable key-value storage for cart snapshots.
//!
//! The cart is persisted as a single text value under a fixed key. The
//! [`CartStorage`] trait is the seam: the storefront uses [`FileStorage`]
//! (one JSON file per key), tests use [`MemoryStorage`].

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Errors that can occur when reading or writing a snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Key contains characters that cannot be used as a file name.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Snapshot could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A previous writer panicked while holding the lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// A blocking key-value store holding whole snapshots.
///
/// `write` replaces the previous value for the key wholesale.
pub trait CartStorage {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be stored. The previous value is
    /// left in place in that case.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: CartStorage + ?Sized> CartStorage for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so readers see either the old snapshot or the new one.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the snapshot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] unless the key is a non-empty run of
    /// ASCII alphanumerics, `-` and `_`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one value.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::default();
        if let Ok(mut values) = storage.values.lock() {
            values.insert(key.to_owned(), value.to_owned());
        }
        storage
    }

    /// The value currently stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.insert(key.to_owned(), value.to_owned());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.read("cart").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        storage.write("cart", "[1]").unwrap();
        storage.write("cart", "[2]").unwrap();

        assert_eq!(storage.read("cart").unwrap().as_deref(), Some("[2]"));
        assert!(!dir.path().join("nested/cart.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let storage = FileStorage::new("unused");
        for key in ["", "../cart", "a/b", "cart.json"] {
            assert!(matches!(
                storage.path_for(key),
                Err(StorageError::InvalidKey(_))
            ));
        }
        assert!(storage.path_for("cart_v2-backup").is_ok());
    }

    #[test]
    fn test_memory_storage_clones_share_values() {
        let storage = MemoryStorage::new();
        let observer = storage.clone();

        storage.write("cart", "[]").unwrap();

        assert_eq!(observer.get("cart").as_deref(), Some("[]"));
        assert_eq!(observer.writes(), 1);
    }

    #[test]
    fn test_arc_storage_delegates() {
        let inner = MemoryStorage::with_value("cart", "[]");
        let shared: Arc<dyn CartStorage + Send + Sync> = Arc::new(inner.clone());

        assert_eq!(shared.read("cart").unwrap().as_deref(), Some("[]"));
        shared.write("cart", "[3]").unwrap();
        assert_eq!(inner.get("cart").as_deref(), Some("[3]"));
    }
}
