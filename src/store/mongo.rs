//! # MongoDB Backend
//!
//! A single pooled client per process. The driver connects lazily and
//! multiplexes concurrent operations over at most `max_pool_size`
//! connections, keeping `min_pool_size` warm when set. The client is
//! never closed explicitly.

use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures_util::TryStreamExt;
use mongodb::options::{ClientOptions, FindOptions as DriverFindOptions, Tls, TlsOptions};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::errors::{StoreError, StoreResult};
use super::{DocumentStore, FindOptions, UpdateCounts};

/// Connection settings for the document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Connection string (`mongodb://` or `mongodb+srv://`)
    #[serde(default)]
    pub uri: String,

    /// Database name; falls back to the connection string's default database
    #[serde(default)]
    pub database: Option<String>,

    /// Upper bound on pooled connections
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,

    /// Connections kept open while idle; the driver default when unset
    #[serde(default)]
    pub min_pool_size: Option<u32>,

    /// Give up selecting a server after this many milliseconds
    #[serde(default = "default_server_selection_timeout_ms")]
    pub server_selection_timeout_ms: u64,

    /// Force TLS on or off; `None` keeps whatever the connection string says
    #[serde(default)]
    pub tls: Option<bool>,
}

pub(crate) fn default_max_pool_size() -> u32 {
    10
}

pub(crate) fn default_server_selection_timeout_ms() -> u64 {
    5000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl StoreConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: None,
            max_pool_size: default_max_pool_size(),
            min_pool_size: None,
            server_selection_timeout_ms: default_server_selection_timeout_ms(),
            tls: None,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

/// MongoDB-backed document store
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Build the pooled client and select the configured database
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        if config.uri.trim().is_empty() {
            return Err(StoreError::Config("connection string is empty".to_string()));
        }

        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| StoreError::Config(e.to_string()))?;
        options.max_pool_size = Some(config.max_pool_size);
        options.min_pool_size = config.min_pool_size;
        options.server_selection_timeout =
            Some(Duration::from_millis(config.server_selection_timeout_ms));
        match config.tls {
            Some(true) => {
                let tls = TlsOptions::builder()
                    .allow_invalid_certificates(false)
                    .build();
                options.tls = Some(Tls::Enabled(tls));
            }
            Some(false) => options.tls = Some(Tls::Disabled),
            None => {}
        }

        let name = config
            .database
            .clone()
            .or_else(|| options.default_database.clone())
            .ok_or_else(|| {
                StoreError::Config("no database name configured or in connection string".to_string())
            })?;

        let client =
            Client::with_options(options).map_err(|e| StoreError::Connection(e.to_string()))?;

        info!(
            database = %name,
            max_pool_size = config.max_pool_size,
            min_pool_size = ?config.min_pool_size,
            "document store client ready"
        );

        Ok(Self {
            database: client.database(&name),
        })
    }

    /// Driver handle for the named collection
    pub fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let driver_options = DriverFindOptions::builder()
            .limit(options.limit)
            .skip(options.skip)
            .sort(options.sort)
            .build();

        let cursor = self
            .collection(collection)
            .find(filter, driver_options)
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>> {
        Ok(self.collection(collection).find_one(filter, None).await?)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<Bson> {
        let result = self.collection(collection).insert_one(document, None).await?;
        Ok(result.inserted_id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        changes: Document,
    ) -> StoreResult<UpdateCounts> {
        let result = self
            .collection(collection)
            .update_one(filter, doc! { "$set": changes }, None)
            .await?;
        Ok(UpdateCounts {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        let result = self.collection(collection).delete_one(filter, None).await?;
        Ok(result.deleted_count)
    }

    async fn count_documents(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        Ok(self
            .collection(collection)
            .count_documents(filter, None)
            .await?)
    }

    async fn collection_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.database.list_collection_names(None).await?)
    }
}
