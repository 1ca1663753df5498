//! # CRUD Module
//!
//! Generic document operations over any collection, and the verb router
//! the admin HTTP endpoints drive them through.

pub mod errors;
pub mod result;
pub mod router;
pub mod service;

pub use errors::{CrudError, CrudResult, MissingDocument, Mutation};
pub use result::{DeleteResult, InsertResult, RouterOutput, UpdateResult};
pub use router::{RequestRouter, Verb};
pub use service::{validate_collection_name, CrudService};
