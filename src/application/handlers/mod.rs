//! Command handlers for the reconciliation and issuance pipeline.

mod issue_documents;
mod process_webhook;

pub use issue_documents::{IssueDocumentsHandler, IssueError, IssuedDocuments, SIGNED_URL_TTL};
pub use process_webhook::{PipelineError, ProcessWebhookHandler, WebhookOutcome};
