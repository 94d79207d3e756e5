//! Remote document store client abstraction.
//!
//! The repositories only need three capabilities from the managed document
//! database: insert a document and learn its id, run a query, and replace
//! some fields of an existing document. [`RemoteStore`] captures exactly
//! that, so tests can substitute [`MemoryRemoteStore`] for the network
//! client without touching any global state.

mod document;
mod error;
mod http;
mod memory;

pub use document::{Direction, Document, FieldFilter, Fields, OrderBy, Query, DOCUMENT_ID_FIELD};
pub use error::RemoteError;
pub use http::HttpRemoteStore;
pub use memory::MemoryRemoteStore;

use async_trait::async_trait;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Inserts a new document and returns the id the store assigned to it.
    async fn insert_one(&self, collection: &str, fields: Fields) -> Result<String, RemoteError>;

    /// Runs a query over a collection.
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, RemoteError>;

    /// Overwrites the given fields of an existing document, leaving the
    /// others untouched.
    async fn replace_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), RemoteError>;
}
