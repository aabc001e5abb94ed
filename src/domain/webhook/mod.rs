//! Inbound gateway webhook handling: signature verification and event parsing.

mod error;
mod event;
mod verifier;

pub use error::WebhookError;
pub use event::{EventKind, EventPayload, GatewayEvent, PaymentEntity};
pub use verifier::{sign_payload, SignatureVerifier};
