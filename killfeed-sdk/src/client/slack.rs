//! Slack incoming-webhook client.

use reqwest::Client;
use url::Url;

use super::ClientError;
use crate::objects::SlackMessage;

/// Posts [`SlackMessage`] payloads to one incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: Client,
    webhook_url: Url,
}

impl SlackClient {
    /// URL prefix every Slack incoming webhook shares.
    pub const WEBHOOK_PREFIX: &'static str = "https://hooks.slack.com/services/";

    pub fn new(webhook_url: Url) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            webhook_url,
        }
    }

    /// `POST {webhook_url}` – deliver one message.
    ///
    /// Slack answers `200 ok` as plain text, so the body is not decoded.
    pub async fn post(&self, message: &SlackMessage) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.webhook_url.clone())
            .json(message)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(ClientError::Api { status, body })
        }
    }
}
