//! # Auth Module
//!
//! Shared-secret admin gate. One password, one fixed bearer token; no
//! users, sessions or expiry.

pub mod errors;
pub mod gate;

pub use errors::{AuthError, AuthResult};
pub use gate::{AdminGate, ADMIN_TOKEN};
