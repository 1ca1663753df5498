//! # Generic Request Router
//!
//! Single seam between the HTTP layer and the CRUD service. Each verb maps
//! onto exactly one CRUD operation, and verb-specific arguments are checked
//! before the store is touched. The router knows nothing about HTTP; the
//! caller maps its errors to status codes.

use std::fmt;
use std::str::FromStr;

use bson::Document;

use super::errors::{CrudError, CrudResult};
use super::result::RouterOutput;
use super::service::CrudService;
use crate::store::FindOptions;

/// Request verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// find
    Get,
    /// insert
    Post,
    /// update
    Put,
    /// delete
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Verb {
    type Err = CrudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "PUT" => Ok(Verb::Put),
            "DELETE" => Ok(Verb::Delete),
            other => Err(CrudError::MethodNotAllowed(other.to_string())),
        }
    }
}

/// Dispatches verb + collection + payload onto the CRUD service
#[derive(Clone)]
pub struct RequestRouter {
    crud: CrudService,
}

impl RequestRouter {
    pub fn new(crud: CrudService) -> Self {
        Self { crud }
    }

    pub fn crud(&self) -> &CrudService {
        &self.crud
    }

    /// Route a request with default read options
    pub async fn handle(
        &self,
        collection: &str,
        verb: Verb,
        data: Option<Document>,
        filter: Option<Document>,
    ) -> CrudResult<RouterOutput> {
        self.handle_with_options(collection, verb, data, filter, FindOptions::default())
            .await
    }

    /// Route a request; `options` only applies to GET
    pub async fn handle_with_options(
        &self,
        collection: &str,
        verb: Verb,
        data: Option<Document>,
        filter: Option<Document>,
        options: FindOptions,
    ) -> CrudResult<RouterOutput> {
        match verb {
            Verb::Get => {
                let filter = filter.unwrap_or_default();
                let docs = self.crud.find(collection, &filter, options).await?;
                Ok(RouterOutput::Documents(docs))
            }
            Verb::Post => {
                let data = data.ok_or_else(|| CrudError::validation("No data provided"))?;
                Ok(RouterOutput::Inserted(self.crud.insert(collection, data).await?))
            }
            Verb::Put => {
                let (data, filter) = match (data, filter) {
                    (Some(data), Some(filter)) => (data, filter),
                    _ => {
                        return Err(CrudError::validation(
                            "Both data and filter are required for update operation",
                        ))
                    }
                };
                Ok(RouterOutput::Updated(
                    self.crud.update(collection, &filter, data).await?,
                ))
            }
            Verb::Delete => {
                let filter = filter.ok_or_else(|| {
                    CrudError::validation("Filter is required for delete operation")
                })?;
                Ok(RouterOutput::Deleted(self.crud.delete(collection, &filter).await?))
            }
        }
    }
}
