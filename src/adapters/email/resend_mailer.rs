//! Resend implementation of the Mailer port.
//!
//! Sends via the Resend HTTP API (`POST /emails`). Attachments are inlined
//! base64; generated documents are small text files, well under the API's
//! payload limit.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::config::EmailConfig;
use crate::ports::{MailError, Mailer, OutgoingEmail};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

pub struct ResendMailer {
    client: Client,
    api_key: SecretString,
    from: String,
}

impl ResendMailer {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.resend_api_key.clone(),
            from: config.from_header(),
        }
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentPayload<'a>>,
}

#[derive(Serialize)]
struct AttachmentPayload<'a> {
    filename: &'a str,
    content: String,
    content_type: &'a str,
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let attachments = email
            .attachments
            .iter()
            .map(|a| AttachmentPayload {
                filename: &a.filename,
                content: BASE64.encode(&a.bytes),
                content_type: &a.content_type,
            })
            .collect();

        let request = SendRequest {
            from: &self.from,
            to: vec![&email.to],
            subject: &email.subject,
            text: &email.body,
            attachments,
        };

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
