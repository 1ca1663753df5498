//! # Contact Module
//!
//! Contact-form submissions forwarded by email.

pub mod errors;
pub mod mailer;
pub mod message;

pub use errors::{MailError, MailResult};
pub use mailer::{create_email_sender, EmailSender, MailConfig, MockEmailSender, SmtpEmailSender};
pub use message::ContactMessage;
