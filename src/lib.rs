//! portfolio-admin - generic document CRUD for a portfolio site
//!
//! A thin data layer over a schema-less document store, the verb router
//! that drives it from the admin panel, a shared-secret admin gate and the
//! public contact mailer.

pub mod auth;
pub mod cli;
pub mod config;
pub mod contact;
pub mod crud;
pub mod document;
pub mod editor;
pub mod filter;
pub mod http_server;
pub mod store;
