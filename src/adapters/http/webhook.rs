//! Gateway webhook intake endpoint.
//!
//! Verification happens over the raw body bytes before any parsing. After
//! verification, the response policy is acknowledge-everything: duplicates,
//! unknown orders, unparseable payloads, and internal failures all return
//! 200 so the gateway stops redelivering. Only authentication failures and
//! missing server configuration are non-2xx.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::handlers::WebhookOutcome;
use crate::domain::webhook::{GatewayEvent, WebhookError};

use super::AppState;

/// Header carrying the hex-encoded HMAC-SHA256 of the request body.
pub const SIGNATURE_HEADER: &str = "X-Gateway-Signature";

/// POST /webhooks/payment
pub async fn handle_payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(verifier) = &state.verifier else {
        tracing::error!("webhook received but no webhook secret is configured");
        let err = WebhookError::SecretNotConfigured;
        return (err.status_code(), Json(error_body(&err))).into_response();
    };

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Err(err) = verifier.verify(&body, signature) {
        tracing::warn!(error = %err, "webhook signature verification failed");
        return (err.status_code(), Json(error_body(&err))).into_response();
    }

    // Authenticated but unparseable: acknowledge, do not invite redelivery
    // of a payload we will never be able to read.
    let event = match GatewayEvent::parse(&body) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(error = %err, "verified webhook body failed to parse");
            return acknowledge("acknowledged");
        }
    };

    match state.webhook.handle(&event).await {
        Ok(outcome) => acknowledge(outcome_label(&outcome)),
        Err(err) => {
            tracing::error!(
                event_kind = %event.event,
                error = %err,
                "webhook pipeline failed, acknowledging delivery"
            );
            acknowledge("acknowledged")
        }
    }
}

fn acknowledge(status: &str) -> Response {
    (StatusCode::OK, Json(serde_json::json!({ "status": status }))).into_response()
}

fn error_body(err: &WebhookError) -> serde_json::Value {
    serde_json::json!({ "error": err.to_string() })
}

fn outcome_label(outcome: &WebhookOutcome) -> &'static str {
    match outcome {
        WebhookOutcome::Processed => "processed",
        WebhookOutcome::AlreadyProcessed => "already_processed",
        WebhookOutcome::UnknownOrder => "acknowledged",
        WebhookOutcome::Acknowledged => "acknowledged",
        WebhookOutcome::Ignored(_) => "ignored",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_outcome_maps_to_a_2xx_label() {
        assert_eq!(outcome_label(&WebhookOutcome::Processed), "processed");
        assert_eq!(
            outcome_label(&WebhookOutcome::AlreadyProcessed),
            "already_processed"
        );
        assert_eq!(outcome_label(&WebhookOutcome::UnknownOrder), "acknowledged");
        assert_eq!(outcome_label(&WebhookOutcome::Acknowledged), "acknowledged");
        assert_eq!(
            outcome_label(&WebhookOutcome::Ignored("x".to_string())),
            "ignored"
        );
    }
}
