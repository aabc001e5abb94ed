//! Local Filesystem Object Store - Implementation of ObjectStore.
//!
//! Stores generated documents under a root directory and mints HMAC-signed
//! expiring URLs for retrieval. Uses atomic writes so a crash mid-write never
//! leaves a truncated document at the published key.
//!
//! # Atomic Writes
//!
//! Uses a write-to-temp-then-rename pattern:
//! 1. Write content to `{key}.tmp`
//! 2. Sync to disk
//! 3. Rename to `{key}`
//!
//! # Signed URLs
//!
//! A signed URL has the shape
//! `{base_url}/{key}?expires={unix_secs}&sig={hex}` where `sig` is
//! HMAC-SHA256 over `"{key}|{expires}"` under the URL signing secret. The
//! serving side recomputes the digest and rejects expired or tampered links.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::ports::{ObjectStore, StorageError};

type HmacSha256 = Hmac<Sha256>;

/// Local filesystem store for generated documents.
pub struct LocalObjectStore {
    root: PathBuf,
    base_url: String,
    signing_secret: SecretString,
}

impl LocalObjectStore {
    pub fn new(
        root: impl Into<PathBuf>,
        base_url: impl Into<String>,
        signing_secret: SecretString,
    ) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            signing_secret,
        }
    }

    /// Rejects keys that could escape the root directory.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.starts_with('/') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        if key.split('/').any(|segment| {
            segment.is_empty() || segment == "." || segment == ".."
        }) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(())
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn sign(&self, key: &str, expires: u64) -> Result<String, StorageError> {
        let mut mac =
            HmacSha256::new_from_slice(self.signing_secret.expose_secret().as_bytes())
                .map_err(StorageError::io)?;
        mac.update(format!("{}|{}", key, expires).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::io(format!(
                    "failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        Self::validate_key(key)?;

        let final_path = self.object_path(key);
        let temp_path = final_path.with_extension("tmp");
        self.ensure_parent_dir(&final_path).await?;

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            StorageError::io(format!(
                "failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.write_all(bytes).await.map_err(|e| {
            StorageError::io(format!(
                "failed to write temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::io(format!(
                "failed to sync temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            StorageError::io(format!(
                "failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, StorageError> {
        Self::validate_key(key)?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(StorageError::io)?;
        let expires = now.as_secs() + ttl.as_secs();
        let sig = self.sign(key, expires)?;

        Ok(format!(
            "{}/{}?expires={}&sig={}",
            self.base_url, key, expires, sig
        ))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
