//! # In-Memory Store
//!
//! Process-local collections with the same contract as the MongoDB backend.
//! Collections are created on first insert and keep insertion order, which
//! is the natural order returned when no sort is given.

use std::collections::HashMap;

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use super::errors::{StoreError, StoreResult};
use super::matcher::{compare_documents, matches, values_equal};
use super::{DocumentStore, FindOptions, UpdateCounts};
use crate::filter::ID_FIELD;

/// In-memory document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut found: Vec<Document> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).cloned().collect())
            .unwrap_or_default();

        if let Some(sort) = &options.sort {
            found.sort_by(|a, b| compare_documents(a, b, sort));
        }

        let skip = options.skip.unwrap_or(0) as usize;
        // a limit of zero means "no limit"; negative limits behave like their magnitude
        let limit = match options.limit {
            Some(0) | None => usize::MAX,
            Some(n) => n.unsigned_abs() as usize,
        };

        Ok(found.into_iter().skip(skip).take(limit).collect())
    }

    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| matches(d, &filter)).cloned()))
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> StoreResult<Bson> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let id = match document.get(ID_FIELD) {
            Some(id) => id.clone(),
            None => {
                // store-assigned identifiers go first, as the driver does
                let id = Bson::ObjectId(ObjectId::new());
                let mut with_id = Document::new();
                with_id.insert(ID_FIELD, id.clone());
                for (field, value) in document {
                    with_id.insert(field, value);
                }
                document = with_id;
                id
            }
        };

        if docs
            .iter()
            .any(|d| d.get(ID_FIELD).map(|existing| values_equal(existing, &id)) == Some(true))
        {
            return Err(StoreError::Operation(format!(
                "duplicate key error collection: {} dup key: {{ _id: {} }}",
                collection, id
            )));
        }

        docs.push(document);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        changes: Document,
    ) -> StoreResult<UpdateCounts> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| matches(d, &filter)));

        let Some(doc) = target else {
            return Ok(UpdateCounts::default());
        };

        if let Some(new_id) = changes.get(ID_FIELD) {
            if doc.get(ID_FIELD) != Some(new_id) {
                return Err(StoreError::Operation(
                    "Performing an update on the path '_id' would modify the immutable field '_id'"
                        .to_string(),
                ));
            }
        }

        let mut modified = false;
        for (field, value) in changes {
            if doc.get(&field) != Some(&value) {
                doc.insert(field, value);
                modified = true;
            }
        }

        Ok(UpdateCounts {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        match docs.iter().position(|d| matches(d, &filter)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count_documents(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn collection_names(&self) -> StoreResult<Vec<String>> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_insert_assigns_object_id() {
        let store = MemoryStore::new();
        let id = store.insert_one("projects", doc! { "title": "A" }).await.unwrap();

        assert!(matches!(id, Bson::ObjectId(_)));
        let stored = store.find_one("projects", doc! { "_id": id.clone() }).await.unwrap().unwrap();
        assert_eq!(stored.keys().next().map(String::as_str), Some("_id"));
        assert_eq!(stored.get_str("title").unwrap(), "A");
    }

    #[tokio::test]
    async fn test_supplied_id_is_kept_and_unique() {
        let store = MemoryStore::new();
        let id = store.insert_one("skills", doc! { "_id": "rust" }).await.unwrap();
        assert_eq!(id, Bson::String("rust".into()));

        let dup = store.insert_one("skills", doc! { "_id": "rust" }).await;
        assert!(matches!(dup, Err(StoreError::Operation(_))));
    }

    #[tokio::test]
    async fn test_find_with_options() {
        let store = MemoryStore::new();
        for i in 0..10 {
            store.insert_one("items", doc! { "idx": i }).await.unwrap();
        }

        let page = store
            .find("items", doc! {}, FindOptions::new().sort(doc! { "idx": -1 }).skip(2).limit(3))
            .await
            .unwrap();
        let idx: Vec<i32> = page.iter().map(|d| d.get_i32("idx").unwrap()).collect();
        assert_eq!(idx, vec![7, 6, 5]);

        let unlimited = store.find("items", doc! {}, FindOptions::new().limit(0)).await.unwrap();
        assert_eq!(unlimited.len(), 10);
    }

    #[tokio::test]
    async fn test_update_reports_unchanged_values() {
        let store = MemoryStore::new();
        store.insert_one("items", doc! { "name": "a", "n": 1 }).await.unwrap();

        let same = store
            .update_one("items", doc! { "name": "a" }, doc! { "n": 1 })
            .await
            .unwrap();
        assert_eq!(same, UpdateCounts { matched: 1, modified: 0 });

        let changed = store
            .update_one("items", doc! { "name": "a" }, doc! { "n": 2 })
            .await
            .unwrap();
        assert_eq!(changed, UpdateCounts { matched: 1, modified: 1 });

        let missing = store
            .update_one("items", doc! { "name": "zz" }, doc! { "n": 2 })
            .await
            .unwrap();
        assert_eq!(missing, UpdateCounts::default());
    }

    #[tokio::test]
    async fn test_delete_and_count() {
        let store = MemoryStore::new();
        store.insert_one("items", doc! { "k": 1 }).await.unwrap();
        store.insert_one("items", doc! { "k": 1 }).await.unwrap();

        assert_eq!(store.count_documents("items", doc! { "k": 1 }).await.unwrap(), 2);
        assert_eq!(store.delete_one("items", doc! { "k": 1 }).await.unwrap(), 1);
        assert_eq!(store.count_documents("items", doc! {}).await.unwrap(), 1);
        assert_eq!(store.delete_one("nothing", doc! {}).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_collection_names_sorted() {
        let store = MemoryStore::new();
        store.insert_one("skills", doc! {}).await.unwrap();
        store.insert_one("projects", doc! {}).await.unwrap();

        assert_eq!(
            store.collection_names().await.unwrap(),
            vec!["projects".to_string(), "skills".to_string()]
        );
    }
}
