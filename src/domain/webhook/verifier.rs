//! Gateway webhook signature verification.
//!
//! The gateway signs each delivery by computing HMAC-SHA256 over the raw
//! request body with a pre-shared secret and sending the digest as lowercase
//! hexadecimal in a signature header. Verification recomputes the digest over
//! the same raw bytes (before any parsing) and compares in constant time.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::error::WebhookError;

/// Verifies that an inbound event genuinely originated from the gateway.
pub struct SignatureVerifier {
    secret: SecretString,
}

impl SignatureVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Checks the hex-encoded signature against the raw body bytes.
    ///
    /// Fails closed: an absent header, undecodable hex, or a digest mismatch
    /// all reject the event.
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> Result<(), WebhookError> {
        let signature = signature.ok_or(WebhookError::MissingSignature)?;

        let provided = hex::decode(signature.trim()).map_err(|_| WebhookError::InvalidSignature)?;
        let expected = self.compute_digest(payload);

        if !constant_time_compare(&expected, &provided) {
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    fn compute_digest(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes the hex signature the gateway would send for a payload.
///
/// Used by test fixtures and by operational tooling that replays deliveries.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}
