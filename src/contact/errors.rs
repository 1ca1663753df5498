//! # Mail Errors

use thiserror::Error;

/// Result type for contact mail
pub type MailResult<T> = Result<T, MailError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailError {
    /// One of name, email, subject, message is blank
    #[error("Missing required fields")]
    MissingFields,

    /// Sender or recipient address does not parse
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Message could not be built or the relay refused it
    #[error("Failed to send email: {0}")]
    Send(String),
}

impl MailError {
    pub fn status_code(&self) -> u16 {
        match self {
            MailError::MissingFields => 400,
            MailError::InvalidAddress(_) | MailError::Send(_) => 500,
        }
    }
}
