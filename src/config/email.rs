//! Email configuration (Resend)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Transactional email configuration.
///
/// This whole section is optional: a deployment without email credentials
/// still processes payments and issues documents, it just reports that no
/// email was sent.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: SecretString,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

impl EmailConfig {
    /// Formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.resend_api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("EMAIL_RESEND_API_KEY"));
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        Ok(())
    }
}

fn default_from_email() -> String {
    "billing@everflowservices.in".to_string()
}

fn default_from_name() -> String {
    "Everflow Home Services".to_string()
}
