//! Staff authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Authentication for the staff-facing regeneration endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Static bearer token staff tooling presents
    pub staff_token: SecretString,
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.staff_token.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_STAFF_TOKEN"));
        }
        Ok(())
    }
}
