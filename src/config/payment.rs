//! Payment gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment gateway webhook configuration.
///
/// The webhook secret is the pre-shared key the gateway signs deliveries
/// with. Validation fails closed: a deployment without it cannot accept
/// webhooks at all.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Shared secret for webhook signature verification
    pub webhook_secret: SecretString,
}

impl PaymentConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.webhook_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT_WEBHOOK_SECRET"));
        }
        Ok(())
    }
}
