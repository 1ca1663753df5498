//! # CRUD Service
//!
//! Collection-agnostic find/insert/update/delete over the store gateway.
//!
//! Update and delete first look up a matching document so a miss can be
//! reported with context instead of a silent zero count. The lookup and the
//! mutation are separate round trips: a concurrent delete in between
//! surfaces as a success with zero modified/deleted documents.

use bson::{Bson, Document};
use tracing::{debug, info, warn};

use super::errors::{CrudError, CrudResult, MissingDocument, Mutation};
use super::result::{DeleteResult, InsertResult, UpdateResult};
use crate::filter::{normalize_filter, strip_alias, ALIAS_FIELD};
use crate::store::{FindOptions, StoreGateway};

/// Generic CRUD over any collection
#[derive(Clone)]
pub struct CrudService {
    gateway: StoreGateway,
}

impl CrudService {
    pub fn new(gateway: StoreGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &StoreGateway {
        &self.gateway
    }

    /// All documents matching `filter`; empty when nothing matches
    pub async fn find(
        &self,
        collection: &str,
        filter: &Document,
        options: FindOptions,
    ) -> CrudResult<Vec<Document>> {
        validate_collection_name(collection)?;
        let filter = normalize_filter(filter);
        debug!(collection, ?filter, "find");

        Ok(self.gateway.collection(collection).find(filter, options).await?)
    }

    /// Insert `data` without its compatibility `id` field
    pub async fn insert(&self, collection: &str, data: Document) -> CrudResult<InsertResult> {
        validate_collection_name(collection)?;
        let data = strip_alias(data);

        let inserted_id = self.gateway.collection(collection).insert_one(data).await?;
        info!(collection, inserted_id = %inserted_id, "document inserted");

        Ok(InsertResult::new(inserted_id))
    }

    /// Merge `data` into the first document matching `filter`
    pub async fn update(
        &self,
        collection: &str,
        filter: &Document,
        data: Document,
    ) -> CrudResult<UpdateResult> {
        validate_collection_name(collection)?;
        let filter = normalize_filter(filter);
        let changes = strip_alias(data);
        if changes.is_empty() {
            return Err(CrudError::validation("No fields provided to update"));
        }

        self.require_match(collection, &filter, Mutation::Update)
            .await?;

        let counts = self
            .gateway
            .collection(collection)
            .update_one(filter, changes)
            .await?;
        info!(
            collection,
            matched = counts.matched,
            modified = counts.modified,
            "document updated"
        );

        Ok(UpdateResult::new(counts.matched, counts.modified))
    }

    /// Delete the first document matching `filter`
    pub async fn delete(&self, collection: &str, filter: &Document) -> CrudResult<DeleteResult> {
        validate_collection_name(collection)?;
        let filter = normalize_filter(filter);

        self.require_match(collection, &filter, Mutation::Delete)
            .await?;

        let deleted = self.gateway.collection(collection).delete_one(filter).await?;
        info!(collection, deleted, "document deleted");

        Ok(DeleteResult::new(deleted))
    }

    /// Names of all collections in the database
    pub async fn collection_names(&self) -> CrudResult<Vec<String>> {
        Ok(self.gateway.collection_names().await?)
    }

    /// Number of documents matching `filter`
    pub async fn count(&self, collection: &str, filter: &Document) -> CrudResult<u64> {
        validate_collection_name(collection)?;
        Ok(self
            .gateway
            .collection(collection)
            .count_documents(normalize_filter(filter))
            .await?)
    }

    /// Whether any document matches `filter`
    pub async fn exists(&self, collection: &str, filter: &Document) -> CrudResult<bool> {
        Ok(self.count(collection, filter).await? > 0)
    }

    /// Look up by identifier. Hex strings address `_id`; anything else is
    /// matched against the compatibility `id` field.
    pub async fn find_by_id(
        &self,
        collection: &str,
        id: impl Into<Bson>,
    ) -> CrudResult<Option<Document>> {
        validate_collection_name(collection)?;
        let filter = normalize_filter(&id_filter(id));
        Ok(self.gateway.collection(collection).find_one(filter).await?)
    }

    pub async fn update_by_id(
        &self,
        collection: &str,
        id: impl Into<Bson>,
        data: Document,
    ) -> CrudResult<UpdateResult> {
        self.update(collection, &id_filter(id), data).await
    }

    pub async fn delete_by_id(
        &self,
        collection: &str,
        id: impl Into<Bson>,
    ) -> CrudResult<DeleteResult> {
        self.delete(collection, &id_filter(id)).await
    }

    /// Existence precondition for update/delete
    async fn require_match(
        &self,
        collection: &str,
        filter: &Document,
        mutation: Mutation,
    ) -> CrudResult<()> {
        let handle = self.gateway.collection(collection);
        if handle.find_one(filter.clone()).await?.is_some() {
            return Ok(());
        }

        let total_documents = handle.count_documents(Document::new()).await?;
        let sample_fields = handle
            .find_one(Document::new())
            .await?
            .map(|doc| doc.keys().cloned().collect());

        let missing = MissingDocument {
            mutation,
            collection: collection.to_string(),
            filter: filter.clone(),
            total_documents,
            sample_fields,
        };
        warn!(collection, total_documents, ?mutation, "no document matched filter");

        Err(CrudError::NotFound(Box::new(missing)))
    }
}

fn id_filter(id: impl Into<Bson>) -> Document {
    let mut filter = Document::new();
    filter.insert(ALIAS_FIELD, id.into());
    filter
}

/// Reject names the store cannot address
pub fn validate_collection_name(name: &str) -> CrudResult<()> {
    if name.trim().is_empty() {
        return Err(CrudError::validation("Collection name is required"));
    }
    if name.contains('$') || name.contains('\0') {
        return Err(CrudError::validation(format!(
            "Invalid collection name: {}",
            name
        )));
    }
    Ok(())
}
