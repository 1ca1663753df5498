//! # Contact Mailer
//!
//! Forwards contact submissions to the site owner. Each submission gets a
//! single delivery attempt; there is no retry or queue.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::errors::{MailError, MailResult};
use super::message::ContactMessage;

/// SMTP relay configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    /// SMTP server host
    pub smtp_host: String,

    /// SMTP server port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username; empty means no authentication
    #[serde(default)]
    pub smtp_user: String,

    /// SMTP password
    #[serde(default)]
    pub smtp_password: String,

    /// Sender mailbox, e.g. `Portfolio Contact Form <contact@example.com>`
    #[serde(default = "default_from")]
    pub from: String,

    /// Where submissions are delivered
    pub to: String,
}

pub(crate) fn default_smtp_port() -> u16 {
    587
}

pub(crate) fn default_from() -> String {
    "Portfolio Contact Form <noreply@portfolio.local>".to_string()
}

/// Email sender abstraction
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver one contact message
    async fn send(&self, message: &ContactMessage) -> MailResult<()>;
}

/// Records messages instead of sending them
#[derive(Debug, Default)]
pub struct MockEmailSender {
    sent: RwLock<Vec<ContactMessage>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of sent emails
    pub async fn sent_count(&self) -> usize {
        self.sent.read().await.len()
    }

    /// Messages recorded so far
    pub async fn sent(&self) -> Vec<ContactMessage> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, message: &ContactMessage) -> MailResult<()> {
        info!(subject = %message.subject, "contact message recorded (no SMTP relay configured)");
        self.sent.write().await.push(message.clone());
        Ok(())
    }
}

/// SMTP email sender
pub struct SmtpEmailSender {
    config: MailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailSender {
    pub fn new(config: MailConfig) -> MailResult<Self> {
        let transport = if config.smtp_user.is_empty() {
            // No authentication (for local development SMTP servers)
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(config.smtp_user.clone(), config.smtp_password.clone());

            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| MailError::Send(format!("SMTP relay error: {}", e)))?
                .credentials(creds)
                .port(config.smtp_port)
                .build()
        };

        Ok(Self { config, transport })
    }

    fn build_message(&self, message: &ContactMessage) -> MailResult<Message> {
        let from: Mailbox = self
            .config
            .from
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("from: {}", e)))?;
        let to: Mailbox = self
            .config
            .to
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("to: {}", e)))?;

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(message.email_subject())
            .header(ContentType::TEXT_PLAIN);

        // reply straight to the visitor when their address is usable
        if let Ok(reply_to) = message.email.parse::<Mailbox>() {
            builder = builder.reply_to(reply_to);
        }

        builder
            .body(message.email_body())
            .map_err(|e| MailError::Send(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, message: &ContactMessage) -> MailResult<()> {
        let email = self.build_message(message)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        info!(to = %self.config.to, "contact message delivered");
        Ok(())
    }
}

/// Create a shared email sender based on config
pub fn create_email_sender(config: Option<MailConfig>) -> MailResult<Arc<dyn EmailSender>> {
    match config {
        Some(cfg) => Ok(Arc::new(SmtpEmailSender::new(cfg)?)),
        None => {
            warn!("SMTP relay not configured; contact messages will only be logged");
            Ok(Arc::new(MockEmailSender::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MailConfig {
        MailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_user: String::new(),
            smtp_password: String::new(),
            from: default_from(),
            to: "owner@example.com".to_string(),
        }
    }

    fn message() -> ContactMessage {
        ContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "Nice site".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_email_sender() {
        let sender = MockEmailSender::new();
        sender.send(&message()).await.unwrap();

        assert_eq!(sender.sent_count().await, 1);
        assert_eq!(sender.sent().await[0].name, "Ada");
    }

    #[tokio::test]
    async fn test_build_message() {
        let sender = SmtpEmailSender::new(config()).unwrap();
        let email = sender.build_message(&message()).unwrap();

        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("Subject: New Contact Form Submission: Hello"));
        assert!(raw.contains("Reply-To: ada@example.com"));
        assert!(raw.contains("To: owner@example.com"));
    }

    #[tokio::test]
    async fn test_invalid_recipient() {
        let sender = SmtpEmailSender::new(MailConfig {
            to: "not an address".to_string(),
            ..config()
        })
        .unwrap();

        assert!(matches!(
            sender.build_message(&message()),
            Err(MailError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_config_defaults() {
        let cfg: MailConfig =
            serde_json::from_str(r#"{"smtp_host": "smtp.example.com", "to": "me@example.com"}"#)
                .unwrap();
        assert_eq!(cfg.smtp_port, 587);
        assert!(cfg.smtp_user.is_empty());
        assert_eq!(cfg.from, default_from());
    }
}
