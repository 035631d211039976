//! Status-change notifications over a Slack incoming webhook.

use crate::data::{ServerStatus, StatusChangeEvent};

use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Webhook request timeout.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Notification error types.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Http(String),
    #[error("webhook returned {0}: {1}")]
    Status(u16, String),
    #[error("invalid input: {0}")]
    Input(String),
}

/// Outcome of sending a batch of notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifySummary {
    pub sent: usize,
    pub failed: usize,
}

/// Format one change as a Slack message.
pub fn build_message(change: &StatusChangeEvent) -> String {
    let emoji = if change.current_status == ServerStatus::Down {
        ":red_circle:"
    } else {
        ":large_green_circle:"
    };

    let mut text = format!(
        "{} *{}* status changed: {} → {}\ntime: `{}`",
        emoji,
        change.server_name,
        change.previous_status,
        change.current_status,
        change.changed_at.to_rfc3339(),
    );

    // Debug keeps the fractional part of whole numbers: `200.0ms`, not `200ms`.
    if let Some(ms) = change.response_time {
        text.push_str(&format!("\nresponse time: `{:?}ms`", ms));
    }

    if let Some(err) = change.error_message.as_deref().filter(|e| !e.is_empty()) {
        text.push_str(&format!("\nerror: `{}`", err));
    }

    text
}

/// Parse a notification input file: a JSON list of change events.
pub fn parse_changes(input: &str) -> Result<Vec<StatusChangeEvent>, NotifyError> {
    let value: serde_json::Value =
        serde_json::from_str(input).map_err(|e| NotifyError::Input(e.to_string()))?;

    if !value.is_array() {
        return Err(NotifyError::Input("expected a JSON list of changes".to_string()));
    }

    serde_json::from_value(value).map_err(|e| NotifyError::Input(e.to_string()))
}

/// Posts messages to a Slack incoming webhook.
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }

    /// Send one message. Anything but `200 OK` is a failure.
    pub async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status(status.as_u16(), body));
        }

        Ok(())
    }

    /// Send one message per change, in order, logging each outcome.
    pub async fn notify_all(&self, changes: &[StatusChangeEvent]) -> NotifySummary {
        let mut summary = NotifySummary::default();

        for change in changes {
            match self.send(&build_message(change)).await {
                Ok(()) => {
                    summary.sent += 1;
                    tracing::info!(
                        "Notified: {} {} → {}",
                        change.server_name,
                        change.previous_status,
                        change.current_status
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!("Notification failed for {}: {}", change.server_name, e);
                }
            }
        }

        summary
    }
}
