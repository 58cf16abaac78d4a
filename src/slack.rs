//! Delivery of notifications to Slack.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::bot::Notification;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Slack returned {status}: {body}")]
    Rejected {
        status: StatusCode,
        body: String,
    },
}

/// Sends a notification somewhere.
#[async_trait]
pub trait Deliver: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError>;
}

/// Posts notifications to a Slack incoming webhook.
pub struct SlackWebhook {
    webhook_url: Url,
    client: reqwest::Client,
}

impl SlackWebhook {
    pub fn new(webhook_url: Url) -> Self {
        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Deliver for SlackWebhook {
    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        debug!("posting notification to {}", notification.channel());

        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(notification)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        check_response(status, body)
    }
}

/// Slack answers `ok` on success, and a short error code with a non-2xx status otherwise.
fn check_response(status: StatusCode, body: String) -> Result<(), DeliveryError> {
    if status.is_success() {
        debug!("notification sent");
        Ok(())
    } else {
        warn!("Slack webhook request failed with {}: {}", status, body);
        Err(DeliveryError::Rejected { status, body })
    }
}

/// Leaves delivery to whoever reads the webhook response.
pub struct ReplyOnly;

#[async_trait]
impl Deliver for ReplyOnly {
    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        debug!(
            "no Slack webhook configured, replying with notification for {}",
            notification.channel()
        );
        Ok(())
    }
}
