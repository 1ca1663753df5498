//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store failures. None of these are retried.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Could not build or reach the client
    #[error("Store connection failed: {0}")]
    Connection(String),

    /// The store rejected or failed a command
    #[error("Store operation failed: {0}")]
    Operation(String),

    /// Connection settings are unusable
    #[error("Invalid store configuration: {0}")]
    Config(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Operation(err.to_string())
    }
}
