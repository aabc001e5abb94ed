//! End-to-end tests for the webhook reconciliation pipeline.
//!
//! These drive the real router and handlers over in-memory adapters:
//! 1. Signature verification gates every delivery
//! 2. Captures activate orders and issue documents exactly once
//! 3. Staff regeneration reuses invoice identity

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use amcdesk::adapters::http::{router, AppState};
use amcdesk::application::handlers::{IssueDocumentsHandler, ProcessWebhookHandler};
use amcdesk::domain::audit::{AuditAction, AuditEntry};
use amcdesk::domain::company::CompanyProfile;
use amcdesk::domain::invoice::Invoice;
use amcdesk::domain::order::{Order, OrderStatus, PaymentStatus};
use amcdesk::domain::payment::{PaymentRecord, PaymentState};
use amcdesk::domain::webhook::{sign_payload, SignatureVerifier};
use amcdesk::ports::{
    AuditLog, CaptureOutcome, InvoiceRepository, MailError, Mailer, ObjectStore, OrderRepository,
    OutgoingEmail, PaymentLedger, StorageError, StoreError,
};

const WEBHOOK_SECRET: &str = "gwsec_integration";
const STAFF_TOKEN: &str = "staff_integration";

// =============================================================================
// In-memory adapters
// =============================================================================

struct InMemoryOrders {
    orders: Mutex<HashMap<Uuid, Order>>,
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    async fn update_activation(&self, order: &Order) -> Result<(), StoreError> {
        let mut orders = self.orders.lock().unwrap();
        if !orders.contains_key(&order.id) {
            return Err(StoreError::NotFound("order"));
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }
}

struct InMemoryLedger {
    records: Mutex<Vec<PaymentRecord>>,
}

#[async_trait]
impl PaymentLedger for InMemoryLedger {
    async fn find_by_gateway_payment_id(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<PaymentRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.gateway_payment_id.as_deref() == Some(gateway_payment_id))
            .cloned())
    }

    async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<PaymentRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.gateway_order_id == gateway_order_id)
            .cloned())
    }

    async fn mark_captured(
        &self,
        record_id: Uuid,
        gateway_payment_id: &str,
        verified_at: DateTime<Utc>,
    ) -> Result<CaptureOutcome, StoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or(StoreError::NotFound("payment record"))?;
        if record.state != PaymentState::Created {
            return Ok(CaptureOutcome::AlreadyFinal);
        }
        record.state = PaymentState::Captured;
        record.gateway_payment_id = Some(gateway_payment_id.to_string());
        record.verified_at = Some(verified_at);
        Ok(CaptureOutcome::Captured)
    }

    async fn mark_failed(&self, record_id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.id == record_id) {
            if record.state == PaymentState::Created {
                record.state = PaymentState::Failed;
            }
        }
        Ok(())
    }
}

struct InMemoryInvoices {
    invoices: Mutex<Vec<Invoice>>,
    sequence: AtomicI64,
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoices {
    async fn find_by_order_id(&self, order_id: Uuid) -> Result<Option<Invoice>, StoreError> {
        Ok(self
            .invoices
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.order_id == order_id)
            .cloned())
    }

    async fn next_sequence_value(&self) -> Result<i64, StoreError> {
        Ok(self.sequence.fetch_add(1, Ordering::SeqCst))
    }

    async fn create_if_absent(&self, invoice: Invoice) -> Result<Invoice, StoreError> {
        let mut invoices = self.invoices.lock().unwrap();
        if let Some(existing) = invoices.iter().find(|i| i.order_id == invoice.order_id) {
            return Ok(existing.clone());
        }
        invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn update_document_urls(
        &self,
        invoice_id: Uuid,
        invoice_url: &str,
        contract_url: &str,
    ) -> Result<(), StoreError> {
        let mut invoices = self.invoices.lock().unwrap();
        let invoice = invoices
            .iter_mut()
            .find(|i| i.id == invoice_id)
            .ok_or(StoreError::NotFound("invoice"))?;
        invoice.invoice_url = Some(invoice_url.to_string());
        invoice.contract_url = Some(contract_url.to_string());
        Ok(())
    }
}

struct InMemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    url_counter: AtomicI64,
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn signed_url(&self, key: &str, _ttl: Duration) -> Result<String, StorageError> {
        // Counter makes regeneration observable: every minting is distinct
        let n = self.url_counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://files.test/{}?sig={}", key, n))
    }
}

struct RecordingAudit {
    entries: Mutex<Vec<AuditEntry>>,
}

#[async_trait]
impl AuditLog for RecordingAudit {
    async fn append(&self, entry: AuditEntry) -> Result<(), StoreError> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

impl RecordingAudit {
    fn count(&self, action: AuditAction) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.action == action)
            .count()
    }
}

struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

// =============================================================================
// Fixture
// =============================================================================

struct Fixture {
    orders: Arc<InMemoryOrders>,
    ledger: Arc<InMemoryLedger>,
    invoices: Arc<InMemoryInvoices>,
    store: Arc<InMemoryStore>,
    audit: Arc<RecordingAudit>,
    mailer: Arc<RecordingMailer>,
    order_id: Uuid,
    record_id: Uuid,
    state: AppState,
}

fn sample_order(id: Uuid) -> Order {
    let now = Utc::now();
    Order {
        id,
        order_number: "ORD-1042".to_string(),
        customer_name: "Asha Rao".to_string(),
        customer_email: "asha@example.com".to_string(),
        customer_phone: "+91 98765 43210".to_string(),
        customer_address: "12 MG Road, Bengaluru 560001".to_string(),
        usage_purpose: "domestic kitchen appliances".to_string(),
        item_count: 3,
        total_amount: 99_900,
        payment_status: PaymentStatus::Pending,
        status: OrderStatus::New,
        valid_from: None,
        valid_until: None,
        gateway_order_id: None,
        gateway_payment_id: None,
        created_at: now,
        updated_at: now,
    }
}

fn fixture() -> Fixture {
    let order_id = Uuid::new_v4();
    let record_id = Uuid::new_v4();

    let orders = Arc::new(InMemoryOrders {
        orders: Mutex::new(HashMap::from([(order_id, sample_order(order_id))])),
    });
    let ledger = Arc::new(InMemoryLedger {
        records: Mutex::new(vec![PaymentRecord {
            id: record_id,
            order_id,
            gateway_order_id: "order_G7h2".to_string(),
            expected_amount: 99_900,
            state: PaymentState::Created,
            gateway_payment_id: None,
            verified_at: None,
            created_at: Utc::now(),
        }]),
    });
    let invoices = Arc::new(InMemoryInvoices {
        invoices: Mutex::new(Vec::new()),
        sequence: AtomicI64::new(1),
    });
    let store = Arc::new(InMemoryStore {
        objects: Mutex::new(HashMap::new()),
        url_counter: AtomicI64::new(0),
    });
    let audit = Arc::new(RecordingAudit {
        entries: Mutex::new(Vec::new()),
    });
    let mailer = Arc::new(RecordingMailer {
        sent: Mutex::new(Vec::new()),
    });

    let issuance = Arc::new(IssueDocumentsHandler::new(
        orders.clone(),
        invoices.clone(),
        store.clone(),
        Some(mailer.clone()),
        audit.clone(),
        CompanyProfile::default(),
    ));
    let webhook = Arc::new(ProcessWebhookHandler::new(
        ledger.clone(),
        orders.clone(),
        audit.clone(),
        issuance.clone(),
    ));

    let state = AppState {
        verifier: Some(Arc::new(SignatureVerifier::new(SecretString::new(
            WEBHOOK_SECRET.to_string(),
        )))),
        webhook,
        issuance,
        staff_token: SecretString::new(STAFF_TOKEN.to_string()),
    };

    Fixture {
        orders,
        ledger,
        invoices,
        store,
        audit,
        mailer,
        order_id,
        record_id,
        state,
    }
}

fn captured_payload() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "event": "payment.captured",
        "payload": {
            "payment": { "id": "pay_K2j9", "order_id": "order_G7h2", "amount": 99_900 }
        }
    }))
    .unwrap()
}

fn signed_webhook_request(payload: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhooks/payment")
        .header("content-type", "application/json")
        .header("X-Gateway-Signature", sign_payload(WEBHOOK_SECRET, payload))
        .body(Body::from(payload.to_vec()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Webhook intake
// =============================================================================

#[tokio::test]
async fn capture_activates_order_and_issues_documents() {
    let fx = fixture();
    let app = router(fx.state.clone());

    let response = app
        .oneshot(signed_webhook_request(&captured_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "processed");

    let order = fx.orders.orders.lock().unwrap()[&fx.order_id].clone();
    assert_eq!(order.status, OrderStatus::Active);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    let window = order.valid_until.unwrap() - order.valid_from.unwrap();
    assert_eq!(window, chrono::Duration::days(365));
    assert_eq!(order.gateway_payment_id.as_deref(), Some("pay_K2j9"));

    let invoices = fx.invoices.invoices.lock().unwrap();
    assert_eq!(invoices.len(), 1);
    assert!(invoices[0].number.as_str().starts_with("INV-"));
    assert!(invoices[0].invoice_url.is_some());
    assert!(invoices[0].contract_url.is_some());

    let objects = fx.store.objects.lock().unwrap();
    assert!(objects.contains_key(&format!("orders/{}/invoice.txt", fx.order_id)));
    assert!(objects.contains_key(&format!("orders/{}/contract.txt", fx.order_id)));

    assert_eq!(fx.audit.count(AuditAction::PaymentCaptured), 1);
    assert_eq!(fx.audit.count(AuditAction::DocumentsGenerated), 1);
    assert_eq!(fx.audit.count(AuditAction::DocumentsEmailed), 1);

    let sent = fx.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "asha@example.com");
    assert_eq!(sent[0].attachments.len(), 2);
}

#[tokio::test]
async fn redelivery_is_acknowledged_without_side_effects() {
    let fx = fixture();
    let payload = captured_payload();

    let first = router(fx.state.clone())
        .oneshot(signed_webhook_request(&payload))
        .await
        .unwrap();
    assert_eq!(response_json(first).await["status"], "processed");

    let second = router(fx.state.clone())
        .oneshot(signed_webhook_request(&payload))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(response_json(second).await["status"], "already_processed");

    // One of everything, despite two deliveries
    assert_eq!(fx.invoices.invoices.lock().unwrap().len(), 1);
    assert_eq!(fx.audit.count(AuditAction::PaymentCaptured), 1);
    assert_eq!(fx.audit.count(AuditAction::DocumentsGenerated), 1);
    assert_eq!(fx.mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn tampered_body_is_rejected_before_any_processing() {
    let fx = fixture();
    let payload = captured_payload();
    let signature = sign_payload(WEBHOOK_SECRET, &payload);

    let mut tampered = payload.clone();
    let pos = tampered.windows(5).position(|w| w == b"99900").unwrap();
    tampered[pos] = b'1';

    let request = Request::builder()
        .method("POST")
        .uri("/webhooks/payment")
        .header("content-type", "application/json")
        .header("X-Gateway-Signature", signature)
        .body(Body::from(tampered))
        .unwrap();

    let response = router(fx.state.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let order = fx.orders.orders.lock().unwrap()[&fx.order_id].clone();
    assert_eq!(order.status, OrderStatus::New);
    assert!(fx.audit.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_signature_header_is_unauthorized() {
    let fx = fixture();
    let request = Request::builder()
        .method("POST")
        .uri("/webhooks/payment")
        .header("content-type", "application/json")
        .body(Body::from(captured_payload()))
        .unwrap();

    let response = router(fx.state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_webhook_secret_is_a_server_error() {
    let mut fx = fixture();
    fx.state.verifier = None;

    let response = router(fx.state)
        .oneshot(signed_webhook_request(&captured_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unknown_checkout_session_is_acknowledged_without_writes() {
    let fx = fixture();
    let payload = serde_json::to_vec(&json!({
        "event": "payment.captured",
        "payload": {
            "payment": { "id": "pay_other", "order_id": "order_unknown", "amount": 50_000 }
        }
    }))
    .unwrap();

    let response = router(fx.state.clone())
        .oneshot(signed_webhook_request(&payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "acknowledged");
    assert!(fx.audit.entries.lock().unwrap().is_empty());
    assert!(fx.invoices.invoices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn amount_mismatch_is_audited_but_still_activates() {
    let fx = fixture();
    let payload = serde_json::to_vec(&json!({
        "event": "payment.captured",
        "payload": {
            "payment": { "id": "pay_K2j9", "order_id": "order_G7h2", "amount": 90_000 }
        }
    }))
    .unwrap();

    let response = router(fx.state.clone())
        .oneshot(signed_webhook_request(&payload))
        .await
        .unwrap();

    assert_eq!(response_json(response).await["status"], "processed");
    assert_eq!(fx.audit.count(AuditAction::AmountMismatch), 1);

    // Documents reflect the captured amount
    let order = fx.orders.orders.lock().unwrap()[&fx.order_id].clone();
    assert_eq!(order.status, OrderStatus::Active);
    assert_eq!(order.total_amount, 90_000);
}

#[tokio::test]
async fn payment_failed_marks_record_and_leaves_order_untouched() {
    let fx = fixture();
    let payload = serde_json::to_vec(&json!({
        "event": "payment.failed",
        "payload": {
            "payment": { "id": "pay_K2j9", "order_id": "order_G7h2", "amount": 99_900 }
        }
    }))
    .unwrap();

    let response = router(fx.state.clone())
        .oneshot(signed_webhook_request(&payload))
        .await
        .unwrap();

    assert_eq!(response_json(response).await["status"], "processed");

    let record = fx
        .ledger
        .records
        .lock()
        .unwrap()
        .iter()
        .find(|r| r.id == fx.record_id)
        .cloned()
        .unwrap();
    assert_eq!(record.state, PaymentState::Failed);

    let order = fx.orders.orders.lock().unwrap()[&fx.order_id].clone();
    assert_eq!(order.status, OrderStatus::New);
    assert_eq!(fx.audit.count(AuditAction::PaymentFailed), 1);
    assert!(fx.invoices.invoices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_event_kind_is_ignored() {
    let fx = fixture();
    let payload = serde_json::to_vec(&json!({
        "event": "refund.processed",
        "payload": {}
    }))
    .unwrap();

    let response = router(fx.state)
        .oneshot(signed_webhook_request(&payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "ignored");
}

// =============================================================================
// Staff regeneration
// =============================================================================

fn regenerate_request(order_id: Uuid, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/orders/{}/documents", order_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn regeneration_reuses_invoice_number_and_replaces_urls() {
    let fx = fixture();

    // First issuance via the webhook
    router(fx.state.clone())
        .oneshot(signed_webhook_request(&captured_payload()))
        .await
        .unwrap();
    let first_number = fx.invoices.invoices.lock().unwrap()[0].number.clone();
    let first_url = fx.invoices.invoices.lock().unwrap()[0]
        .invoice_url
        .clone()
        .unwrap();

    let response = router(fx.state.clone())
        .oneshot(regenerate_request(fx.order_id, STAFF_TOKEN))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["invoice_number"], first_number.as_str());
    assert_eq!(body["email_sent"], true);

    let invoices = fx.invoices.invoices.lock().unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].number, first_number);
    assert_ne!(invoices[0].invoice_url.as_deref(), Some(first_url.as_str()));
}

#[tokio::test]
async fn regeneration_rejects_bad_token() {
    let fx = fixture();

    let response = router(fx.state)
        .oneshot(regenerate_request(Uuid::new_v4(), "wrong_token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn regeneration_of_unknown_order_is_not_found() {
    let fx = fixture();

    let response = router(fx.state)
        .oneshot(regenerate_request(Uuid::new_v4(), STAFF_TOKEN))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let fx = fixture();
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router(fx.state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
