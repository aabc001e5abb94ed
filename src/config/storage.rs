//! Object storage configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Document storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for stored objects
    #[serde(default = "default_root")]
    pub root: String,

    /// Public base URL signed retrieval links are minted under
    pub public_base_url: String,

    /// Secret for signing retrieval URLs
    pub url_signing_secret: SecretString,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.public_base_url.is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE_PUBLIC_BASE_URL"));
        }
        if !self.public_base_url.starts_with("http://")
            && !self.public_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidStorageBaseUrl);
        }
        if self.url_signing_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired(
                "STORAGE_URL_SIGNING_SECRET",
            ));
        }
        Ok(())
    }
}

fn default_root() -> String {
    "./data/documents".to_string()
}
