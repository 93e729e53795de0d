use crate::document::{Document, Query};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Collection-of-JSON-documents persistence.
///
/// Every service talks to the store through `Arc<dyn DocumentStore>` so the
/// in-memory store used by tests and the CLI can be swapped for a hosted one.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, `None` if missing
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Create a document under a generated id and return that id
    async fn insert(&self, collection: &str, data: Value) -> Result<String>;

    /// Create or overwrite a document under a caller-chosen id
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<Document>;

    /// Shallow-merge top-level fields into an existing document
    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<Document>;

    /// Overwrite a document only if its revision still equals `expected`.
    ///
    /// `expected == 0` means the document must not exist yet. A mismatch
    /// fails with `StoreError::Conflict` and leaves the document untouched.
    async fn replace_if_revision(
        &self,
        collection: &str,
        id: &str,
        expected: u64,
        data: Value,
    ) -> Result<Document>;

    /// Remove a document. Fails with `NotFound` if it doesn't exist.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>>;

    /// Every document in a collection, in insertion order
    async fn all(&self, collection: &str) -> Result<Vec<Document>> {
        self.query(collection, &Query::new()).await
    }
}

/// Binary object storage for uploaded media
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes at `path` and return the public URL
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;

    async fn delete(&self, path: &str) -> Result<()>;

    fn url(&self, path: &str) -> String;
}
