//! # Document Store Gateway
//!
//! One owned gateway per process, created at startup and handed to the CRUD
//! layer. The gateway hides which backend is in use and exposes collection
//! handles by name.
//!
//! Backends:
//! - [`MongoStore`]: a pooled MongoDB client
//! - [`MemoryStore`]: process-local collections, used by tests and local runs

pub mod errors;
pub mod matcher;
pub mod memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use bson::{Bson, Document};

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use mongo::{MongoStore, StoreConfig};

/// Options for multi-document reads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub limit: Option<i64>,
    pub skip: Option<u64>,
    /// Field to direction (`1` ascending, `-1` descending)
    pub sort: Option<Document>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Counts reported by a single-document update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCounts {
    pub matched: u64,
    pub modified: u64,
}

/// Operations a document store backend must provide.
///
/// Filters reaching a backend are already normalized; backends apply
/// exact-match semantics and never fail on zero matches.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents matching `filter`
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// First document matching `filter`, if any
    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>>;

    /// Insert a document and return its identifier
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<Bson>;

    /// Merge `changes` into the first document matching `filter`
    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        changes: Document,
    ) -> StoreResult<UpdateCounts>;

    /// Delete the first document matching `filter`, returning the count removed
    async fn delete_one(&self, collection: &str, filter: Document) -> StoreResult<u64>;

    /// Number of documents matching `filter`
    async fn count_documents(&self, collection: &str, filter: Document) -> StoreResult<u64>;

    /// Names of every collection in the database
    async fn collection_names(&self) -> StoreResult<Vec<String>>;
}

/// Shared handle to the configured store
#[derive(Clone)]
pub struct StoreGateway {
    backend: Arc<dyn DocumentStore>,
}

impl StoreGateway {
    /// Wrap an existing backend
    pub fn new<S: DocumentStore + 'static>(backend: S) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Wrap an already shared backend
    pub fn from_arc(backend: Arc<dyn DocumentStore>) -> Self {
        Self { backend }
    }

    /// Open the pooled MongoDB client described by `config`
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        Ok(Self::new(MongoStore::connect(config).await?))
    }

    /// Gateway over fresh in-memory collections
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Handle for the named collection
    pub fn collection(&self, name: &str) -> CollectionHandle {
        CollectionHandle {
            backend: Arc::clone(&self.backend),
            name: name.to_string(),
        }
    }

    pub async fn collection_names(&self) -> StoreResult<Vec<String>> {
        self.backend.collection_names().await
    }
}

/// A collection bound to the gateway's backend
#[derive(Clone)]
pub struct CollectionHandle {
    backend: Arc<dyn DocumentStore>,
    name: String,
}

impl CollectionHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn find(&self, filter: Document, options: FindOptions) -> StoreResult<Vec<Document>> {
        self.backend.find(&self.name, filter, options).await
    }

    pub async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>> {
        self.backend.find_one(&self.name, filter).await
    }

    pub async fn insert_one(&self, document: Document) -> StoreResult<Bson> {
        self.backend.insert_one(&self.name, document).await
    }

    pub async fn update_one(&self, filter: Document, changes: Document) -> StoreResult<UpdateCounts> {
        self.backend.update_one(&self.name, filter, changes).await
    }

    pub async fn delete_one(&self, filter: Document) -> StoreResult<u64> {
        self.backend.delete_one(&self.name, filter).await
    }

    pub async fn count_documents(&self, filter: Document) -> StoreResult<u64> {
        self.backend.count_documents(&self.name, filter).await
    }
}
