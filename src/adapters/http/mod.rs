//! HTTP surface: webhook intake, staff document regeneration, health.

mod documents;
mod webhook;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::SecretString;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::handlers::{IssueDocumentsHandler, ProcessWebhookHandler};
use crate::domain::webhook::SignatureVerifier;

pub use documents::regenerate_documents;
pub use webhook::handle_payment_webhook;

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    /// Absent when the webhook secret is not configured; the webhook
    /// endpoint then fails closed with a server error.
    pub verifier: Option<Arc<SignatureVerifier>>,
    pub webhook: Arc<ProcessWebhookHandler>,
    pub issuance: Arc<IssueDocumentsHandler>,
    pub staff_token: SecretString,
}

/// Builds the application router.
///
/// # Routes
/// - `POST /webhooks/payment` - gateway webhook intake (signature verified)
/// - `POST /orders/:order_id/documents` - staff document regeneration (bearer token)
/// - `GET /health` - liveness probe
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhooks/payment", post(handle_payment_webhook))
        .route("/orders/:order_id/documents", post(regenerate_documents))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
