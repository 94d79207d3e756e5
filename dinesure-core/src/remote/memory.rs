//! In-process document store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{Document, Fields, Query, RemoteError, RemoteStore};

/// A [`RemoteStore`] backed by memory.
///
/// Ids are 32-character hex strings. Every operation fails with
/// [`RemoteError::Unavailable`] while [`set_failing`](Self::set_failing) is on.
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collections(&self) -> MutexGuard<'_, HashMap<String, Vec<Document>>> {
        self.collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of trait calls made so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Inserts a document directly, bypassing failure injection.
    pub fn seed(&self, collection: &str, doc: Document) {
        self.collections()
            .entry(collection.to_string())
            .or_default()
            .push(doc);
    }

    /// Snapshot of a collection in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn begin_call(&self) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn insert_one(&self, collection: &str, fields: Fields) -> Result<String, RemoteError> {
        self.begin_call()?;
        let id = Uuid::new_v4().simple().to_string();
        self.seed(collection, Document::new(id.clone(), fields));
        Ok(id)
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, RemoteError> {
        self.begin_call()?;
        Ok(query.apply(&self.documents(collection)))
    }

    async fn replace_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), RemoteError> {
        self.begin_call()?;
        let mut collections = self.collections();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| RemoteError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        for (key, value) in fields {
            doc.fields.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let store = MemoryRemoteStore::new();
        let a = store.insert_one("bookings", fields(json!({"n": 1}))).await.unwrap();
        let b = store.insert_one("bookings", fields(json!({"n": 2}))).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert_eq!(store.documents("bookings").len(), 2);
    }

    #[tokio::test]
    async fn test_query_unknown_collection_is_empty() {
        let store = MemoryRemoteStore::new();
        let docs = store.query("nothing", &Query::all()).await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_replace_fields_merges() {
        let store = MemoryRemoteStore::new();
        store.seed(
            "restaurants",
            Document::new("r1", fields(json!({"name": "A", "tables": []}))),
        );

        store
            .replace_fields("restaurants", "r1", fields(json!({"tables": [1]})))
            .await
            .unwrap();

        let doc = &store.documents("restaurants")[0];
        assert_eq!(doc.fields["name"], json!("A"));
        assert_eq!(doc.fields["tables"], json!([1]));
    }

    #[tokio::test]
    async fn test_replace_fields_missing_document() {
        let store = MemoryRemoteStore::new();
        let result = store
            .replace_fields("restaurants", "nope", Fields::new())
            .await;
        assert!(matches!(result, Err(RemoteError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_failing_store_rejects_everything() {
        let store = MemoryRemoteStore::new();
        store.set_failing(true);

        assert!(store.query("restaurants", &Query::all()).await.is_err());
        assert!(store.insert_one("bookings", Fields::new()).await.is_err());
        assert_eq!(store.call_count(), 2);
        assert!(store.documents("bookings").is_empty());

        store.set_failing(false);
        assert!(store.insert_one("bookings", Fields::new()).await.is_ok());
    }
}
