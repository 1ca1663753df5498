//! # CRUD Errors
//!
//! Error types for the CRUD layer and the request router.

use std::fmt;

use bson::Document;
use thiserror::Error;

use crate::document::document_to_json;
use crate::store::StoreError;

/// Result type for CRUD operations
pub type CrudResult<T> = Result<T, CrudError>;

/// CRUD layer errors
#[derive(Debug, Clone, Error)]
pub enum CrudError {
    /// Missing or malformed caller arguments; nothing was sent to the store
    #[error("{0}")]
    Validation(String),

    /// Update/delete precondition failed
    #[error("{0}")]
    NotFound(Box<MissingDocument>),

    /// Verb outside GET/POST/PUT/DELETE
    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    /// Store or network failure, propagated as-is
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CrudError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CrudError::Validation(msg.into())
    }
}

/// Which mutation failed its existence check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Update,
    Delete,
}

/// Diagnostic context for a failed existence check
#[derive(Debug, Clone, PartialEq)]
pub struct MissingDocument {
    pub mutation: Mutation,
    pub collection: String,
    pub filter: Document,
    pub total_documents: u64,
    /// Field names of one document in the collection, if it has any
    pub sample_fields: Option<Vec<String>>,
}

impl fmt::Display for MissingDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No document found matching the filter")?;
        if self.mutation == Mutation::Delete {
            write!(f, " for deletion")?;
        }
        write!(
            f,
            ". Collection: {}, Filter: {}, Total documents in collection: {}",
            self.collection,
            document_to_json(&self.filter),
            self.total_documents
        )?;
        if let Some(fields) = &self.sample_fields {
            write!(f, ", Sample document structure: [{}]", fields.join(", "))?;
        }
        Ok(())
    }
}
