//! Document store boundary shared by every submission collection.
//!
//! The store is a flat set of collections, each holding JSON documents keyed by a
//! store-generated identifier. Every operation touches a single document; there is no
//! multi-document atomicity.

pub mod firestore;
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use firestore::FirestoreStore;
pub use memory::MemoryDocumentStore;

/// Identifier assigned by the store when a document is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Raw document as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store read failed: {0}")]
    Read(String),
    #[error("store write failed: {0}")]
    Write(String),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short name used in logs.
    fn backend_tag(&self) -> &'static str;

    async fn create(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<DocumentId, StoreError>;

    /// Empty or unknown collections yield an empty vector.
    async fn list(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError>;

    async fn fetch(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>, StoreError>;

    /// Replaces exactly one field; fails with [`StoreError::Write`] when the document is absent.
    async fn update_field(
        &self,
        collection: &str,
        id: &DocumentId,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError>;
}
