//! One-time code delivery
//!
//! Sends are fire-and-forget: [`dispatch_code`] spawns the send and only logs
//! a failure.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notification rejected with status {0}")]
    Rejected(u16),
}

/// Sends a short-lived numeric code to a contact address
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_code(&self, to: &str, code: &str) -> Result<(), NotifyError>;
}

/// Writes codes to the log (development)
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_code(&self, to: &str, code: &str) -> Result<(), NotifyError> {
        tracing::info!(to = to, code = code, "One-time code (log sender)");
        Ok(())
    }
}

#[derive(Serialize)]
struct CodeMessage<'a> {
    to: &'a str,
    body: String,
}

/// Posts codes to an HTTP webhook (SMS gateway or similar)
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send_code(&self, to: &str, code: &str) -> Result<(), NotifyError> {
        let message = CodeMessage {
            to,
            body: format!("Your verification code is {code}. Valid for 5 minutes."),
        };
        let mut request = self.client.post(&self.url).json(&message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(NotifyError::Rejected(resp.status().as_u16()));
        }
        tracing::info!(to = to, "One-time code sent");
        Ok(())
    }
}

/// Send in the background; failures are logged, never retried
pub fn dispatch_code(notifier: Arc<dyn Notifier>, to: String, code: String) {
    tokio::spawn(async move {
        if let Err(e) = notifier.send_code(&to, &code).await {
            tracing::warn!(to = %to, error = %e, "Failed to deliver one-time code");
        }
    });
}
