use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use super::{KeyValueStorage, MemoryStorage, StorageError};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to serialize value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Corrupt cache entry '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON-serializing cache over a [`KeyValueStorage`].
///
/// `store` and `load` never fail outward: a write that cannot be persisted
/// is logged and dropped, and an absent, unreadable or corrupt entry reads
/// as `None`. Clones share the same backend. There is no locking across
/// read-modify-write sequences, so the last writer wins.
#[derive(Clone)]
pub struct LocalCacheStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl LocalCacheStore {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    pub fn from_shared(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Serializes `data` under `key`, overwriting any previous value.
    pub fn store<T: Serialize + ?Sized>(&self, key: &str, data: &T) {
        if let Err(e) = self.try_store(key, data) {
            tracing::warn!("Error storing data for key {}: {}", key, e);
        }
    }

    /// Reads and deserializes the value under `key`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_load(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Error retrieving data for key {}: {}", key, e);
                None
            }
        }
    }

    pub(crate) fn try_store<T: Serialize + ?Sized>(
        &self,
        key: &str,
        data: &T,
    ) -> Result<(), CacheError> {
        let json = serde_json::to_string(data).map_err(|source| CacheError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.storage.set(key, &json)?;
        Ok(())
    }

    pub(crate) fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let Some(raw) = self.storage.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| CacheError::Corrupt {
                key: key.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FileStorage;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        name: String,
        count: u32,
    }

    fn entry(name: &str, count: u32) -> Entry {
        Entry {
            name: name.to_string(),
            count,
        }
    }

    #[test]
    fn test_load_absent_is_none() {
        let cache = LocalCacheStore::in_memory();
        assert_eq!(cache.load::<Vec<Entry>>("restaurants"), None);
    }

    #[test]
    fn test_store_then_load() {
        let cache = LocalCacheStore::in_memory();
        cache.store("restaurants", &vec![entry("a", 1), entry("b", 2)]);

        let loaded: Vec<Entry> = cache.load("restaurants").unwrap();
        assert_eq!(loaded, vec![entry("a", 1), entry("b", 2)]);
    }

    #[test]
    fn test_store_overwrites() {
        let cache = LocalCacheStore::in_memory();
        cache.store("k", &entry("first", 1));
        cache.store("k", &entry("second", 2));
        assert_eq!(cache.load::<Entry>("k"), Some(entry("second", 2)));
    }

    #[test]
    fn test_corrupt_entry_reads_as_none() {
        let storage = Arc::new(MemoryStorage::new());
        storage.insert_raw("bookings", "{not json");
        let cache = LocalCacheStore::from_shared(storage);

        assert_eq!(cache.load::<Vec<Entry>>("bookings"), None);
        assert!(matches!(
            cache.try_load::<Vec<Entry>>("bookings"),
            Err(CacheError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_wrong_shape_reads_as_none() {
        let cache = LocalCacheStore::in_memory();
        cache.store("k", &vec![1, 2, 3]);
        assert_eq!(cache.load::<Entry>("k"), None);
    }

    #[test]
    fn test_full_storage_is_silent() {
        let cache = LocalCacheStore::new(MemoryStorage::with_quota(4));
        cache.store("k", &entry("too big to fit", 99));

        assert_eq!(cache.load::<Entry>("k"), None);
        assert!(matches!(
            cache.try_store("k", &entry("too big to fit", 99)),
            Err(CacheError::Storage(StorageError::QuotaExceeded { .. }))
        ));
    }

    #[test]
    fn test_invalid_key_is_silent() {
        let temp_dir = TempDir::new().unwrap();
        let cache = LocalCacheStore::new(FileStorage::new(temp_dir.path()));

        cache.store("../outside", &entry("x", 1));
        assert_eq!(cache.load::<Entry>("../outside"), None);
    }

    #[test]
    fn test_file_backed_survives_new_instance() {
        let temp_dir = TempDir::new().unwrap();
        LocalCacheStore::new(FileStorage::new(temp_dir.path())).store("k", &entry("kept", 7));

        let reopened = LocalCacheStore::new(FileStorage::new(temp_dir.path()));
        assert_eq!(reopened.load::<Entry>("k"), Some(entry("kept", 7)));
    }
}
