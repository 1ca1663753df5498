//! # Contact Message
//!
//! A contact-form submission and the email rendered from it.

use serde::{Deserialize, Serialize};

use super::errors::{MailError, MailResult};

/// Contact form payload. Fields default to empty so a partial body reaches
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactMessage {
    /// All four fields must be present and non-blank
    pub fn validate(&self) -> MailResult<()> {
        let missing = [&self.name, &self.email, &self.subject, &self.message]
            .iter()
            .any(|value| value.trim().is_empty());

        if missing {
            Err(MailError::MissingFields)
        } else {
            Ok(())
        }
    }

    /// Subject line of the forwarded email
    pub fn email_subject(&self) -> String {
        format!("New Contact Form Submission: {}", self.subject)
    }

    /// Plain-text body of the forwarded email
    pub fn email_body(&self) -> String {
        format!(
            "New Contact Form Submission\n\n\
            Name: {}\n\
            Email: {}\n\n\
            Message:\n\
            {}\n",
            self.name, self.email, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> ContactMessage {
        ContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "Nice site".to_string(),
        }
    }

    #[test]
    fn test_validate() {
        assert!(message().validate().is_ok());

        let blank = ContactMessage {
            subject: "   ".to_string(),
            ..message()
        };
        assert_eq!(blank.validate(), Err(MailError::MissingFields));
        assert_eq!(ContactMessage::default().validate(), Err(MailError::MissingFields));
    }

    #[test]
    fn test_rendering() {
        let msg = message();
        assert_eq!(msg.email_subject(), "New Contact Form Submission: Hello");

        let body = msg.email_body();
        assert!(body.contains("Name: Ada"));
        assert!(body.contains("Email: ada@example.com"));
        assert!(body.contains("Nice site"));
    }

    #[test]
    fn test_partial_payload_deserializes() {
        let msg: ContactMessage = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
        assert_eq!(msg.name, "Ada");
        assert!(msg.validate().is_err());
    }
}
