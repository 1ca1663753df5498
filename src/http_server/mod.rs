//! # HTTP Server Module
//!
//! Axum server exposing the admin CRUD API, admin login and the contact
//! form.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/auth/login` - Admin login
//! - `/api/admin/*` - Collection CRUD (bearer token required)
//! - `/api/sendEmail` - Contact form

pub mod admin_routes;
pub mod auth_routes;
pub mod config;
pub mod contact_routes;
pub mod errors;
pub mod health_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::{AppServices, HttpServer};
