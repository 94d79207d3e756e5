//! Persistent key-value storage backends for the local cache.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Errors raised by a storage backend. The cache swallows all of them.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),

    #[error("Storage quota exceeded writing '{key}' ({needed} bytes, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Minimal string key-value persistence.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each key as `<key>.json` in a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Keys become file names, so path separators are refused.
    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty()
            || key.contains('/')
            || key.contains('\\')
            || key.contains("..")
            || key.starts_with('.')
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.data_dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::Io(self.data_dir.clone(), e))?;

        // temp file + rename so readers never see a half-written value
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value).map_err(|e| StorageError::Io(temp_path.clone(), e))?;
        fs::rename(&temp_path, &path).map_err(|e| StorageError::Io(path, e))?;
        Ok(())
    }
}

/// Volatile storage, optionally limited to a total number of bytes across
/// all values.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(quota),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Writes a raw value, bypassing the quota. Lets tests plant corrupt data.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries().insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries();
        if let Some(quota) = self.quota {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let available = quota.saturating_sub(used);
            if value.len() > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed: value.len(),
                    available,
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().to_path_buf());
        (storage, temp_dir)
    }

    #[test]
    fn test_file_get_missing_returns_none() {
        let (storage, _temp) = test_storage();
        assert!(storage.get("restaurants").unwrap().is_none());
    }

    #[test]
    fn test_file_set_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("cache");
        let storage = FileStorage::new(nested.clone());

        storage.set("bookings", "[]").unwrap();

        assert!(nested.join("bookings.json").exists());
        assert!(!nested.join("bookings.json.tmp").exists());
    }

    #[test]
    fn test_file_overwrite() {
        let (storage, _temp) = test_storage();
        storage.set("bookings", "[1]").unwrap();
        storage.set("bookings", "[2]").unwrap();
        assert_eq!(storage.get("bookings").unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn test_file_rejects_path_keys() {
        let (storage, _temp) = test_storage();
        assert!(matches!(
            storage.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(storage.get("a/b").is_err());
        assert!(storage.get("").is_err());
    }

    #[test]
    fn test_memory_roundtrip() {
        let storage = MemoryStorage::new();
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        assert!(storage.get("other").unwrap().is_none());
    }

    #[test]
    fn test_memory_quota_exceeded() {
        let storage = MemoryStorage::with_quota(8);
        storage.set("a", "12345").unwrap();

        let err = storage.set("b", "12345").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { available: 3, .. }));
        assert!(storage.get("b").unwrap().is_none());
    }

    #[test]
    fn test_memory_quota_counts_replaced_value_once() {
        let storage = MemoryStorage::with_quota(8);
        storage.set("a", "12345").unwrap();
        storage.set("a", "12345678").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("12345678"));
    }
}
