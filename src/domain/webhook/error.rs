//! Webhook error types with HTTP status mapping.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors surfaced at the webhook boundary.
///
/// Only authentication failures and missing server-side configuration map to
/// non-2xx responses; every other failure mode is acknowledged after it has
/// been logged, so the gateway's retries cannot turn a persistent internal
/// error into a retry storm.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No signature header was supplied.
    #[error("missing signature header")]
    MissingSignature,

    /// The supplied signature does not match the request body.
    #[error("invalid signature")]
    InvalidSignature,

    /// The shared webhook secret is not configured.
    #[error("webhook secret not configured")]
    SecretNotConfigured,
}

impl WebhookError {
    /// Maps the error to the response code the gateway should see.
    ///
    /// Authentication failures are non-2xx so the sender's retry semantics
    /// stay intact for a misconfigured deployment, distinct from "received,
    /// do not retry".
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }
            WebhookError::SecretNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
