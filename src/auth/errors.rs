//! # Auth Errors
//!
//! Error types for the admin gate.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Admin gate errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong password
    #[error("Invalid password")]
    InvalidCredentials,

    /// Missing or unrecognized bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// No admin password configured
    #[error("Admin password not configured")]
    NotConfigured,
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials => 401,
            AuthError::Unauthorized => 401,
            AuthError::NotConfigured => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::Unauthorized.status_code(), 401);
        assert_eq!(AuthError::NotConfigured.status_code(), 500);
    }
}
