//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `AMCDESK` prefix
//! and `__` (double underscore) separating nested sections, e.g.
//! `AMCDESK__PAYMENT__WEBHOOK_SECRET`.
//!
//! Configuration is an explicitly constructed object passed into the pipeline
//! at startup, never ambient lookups inside handlers; the fail-closed rules
//! are therefore testable in isolation.

mod auth;
mod database;
mod email;
mod error;
mod payment;
mod server;
mod storage;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::ServerConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

use crate::domain::company::CompanyProfile;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Payment gateway webhook configuration
    pub payment: PaymentConfig,

    /// Document storage configuration
    pub storage: StorageConfig,

    /// Email configuration; absence is a valid (degraded) state
    #[serde(default)]
    pub email: Option<EmailConfig>,

    /// Staff authentication
    pub auth: AuthConfig,

    /// Issuer profile printed on documents
    #[serde(default)]
    pub company: CompanyProfile,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads `.env` if present (development), then reads variables with the
    /// `AMCDESK` prefix.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().prefix("AMCDESK").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate()?;
        self.storage.validate()?;
        if let Some(email) = &self.email {
            email.validate()?;
        }
        self.auth.validate()?;
        Ok(())
    }
}
