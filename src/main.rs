//! Service entry point: configuration, database, dependency wiring, server.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use amcdesk::adapters::email::ResendMailer;
use amcdesk::adapters::http::{router, AppState};
use amcdesk::adapters::postgres::{
    PostgresAuditLog, PostgresInvoiceRepository, PostgresOrderRepository, PostgresPaymentLedger,
};
use amcdesk::adapters::storage::LocalObjectStore;
use amcdesk::application::handlers::{IssueDocumentsHandler, ProcessWebhookHandler};
use amcdesk::config::AppConfig;
use amcdesk::domain::webhook::SignatureVerifier;
use amcdesk::ports::Mailer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database connected, migrations applied");

    let orders = Arc::new(PostgresOrderRepository::new(pool.clone()));
    let invoices = Arc::new(PostgresInvoiceRepository::new(pool.clone()));
    let ledger = Arc::new(PostgresPaymentLedger::new(pool.clone()));
    let audit = Arc::new(PostgresAuditLog::new(pool));

    let store = Arc::new(LocalObjectStore::new(
        &config.storage.root,
        &config.storage.public_base_url,
        config.storage.url_signing_secret.clone(),
    ));

    let mailer: Option<Arc<dyn Mailer>> = match &config.email {
        Some(email) => Some(Arc::new(ResendMailer::new(email))),
        None => {
            tracing::warn!("email not configured, customer notifications will be skipped");
            None
        }
    };

    let issuance = Arc::new(IssueDocumentsHandler::new(
        orders.clone(),
        invoices,
        store,
        mailer,
        audit.clone(),
        config.company.clone(),
    ));
    let webhook = Arc::new(ProcessWebhookHandler::new(
        ledger,
        orders,
        audit,
        issuance.clone(),
    ));

    let state = AppState {
        verifier: Some(Arc::new(SignatureVerifier::new(
            config.payment.webhook_secret.clone(),
        ))),
        webhook,
        issuance,
        staff_token: config.auth.staff_token.clone(),
    };

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router(state)).await?;

    Ok(())
}
