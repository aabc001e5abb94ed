//! Mailer port: transactional email with attachments.

use async_trait::async_trait;
use thiserror::Error;

/// A binary attachment.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// One outgoing transactional email.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
}

/// Errors from the email service.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("email request failed: {0}")]
    Transport(String),

    #[error("email service returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Port for the transactional-email service.
///
/// Callers treat send failures as soft: the pipeline completes and reports
/// that no email was sent rather than rolling back generated documents.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}
