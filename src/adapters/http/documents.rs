//! Staff endpoint for regenerating order documents.
//!
//! Authenticated with a static bearer token. Regeneration reuses the
//! invoice number and overwrites the stored documents, so staff can safely
//! re-trigger issuance after fixing customer details.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use secrecy::ExposeSecret;
use serde::Serialize;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::application::handlers::IssueError;
use crate::domain::audit::Actor;

use super::AppState;

#[derive(Serialize)]
struct RegenerateResponse {
    invoice_number: String,
    invoice_url: String,
    contract_url: String,
    email_sent: bool,
}

/// POST /orders/:order_id/documents
pub async fn regenerate_documents(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    if !is_authorized(&headers, state.staff_token.expose_secret()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "invalid or missing bearer token" })),
        )
            .into_response();
    }

    match state
        .issuance
        .issue_for_order(order_id, Actor::Staff("staff_api".to_string()))
        .await
    {
        Ok(issued) => (
            StatusCode::OK,
            Json(RegenerateResponse {
                invoice_number: issued.invoice_number,
                invoice_url: issued.invoice_url,
                contract_url: issued.contract_url,
                email_sent: issued.email_sent,
            }),
        )
            .into_response(),
        Err(IssueError::OrderNotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("order {} not found", id) })),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(%order_id, error = %err, "document regeneration failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "document issuance failed, retry later" })),
            )
                .into_response()
        }
    }
}

fn is_authorized(headers: &HeaderMap, staff_token: &str) -> bool {
    let Some(presented) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    else {
        return false;
    };

    presented.as_bytes().ct_eq(staff_token.as_bytes()).into()
}
