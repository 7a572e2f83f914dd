use async_trait::async_trait;
use killfeed_sdk::client::SlackClient;
use killfeed_sdk::objects::SlackMessage;
use tracing::{info, warn};

use crate::health::{Activity, HealthReporter};

/// Final destination of composed notifications.
///
/// Delivery is fire-and-forget: failures are logged by the sink and never
/// reported back to the pipeline.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn deliver(&self, message: &SlackMessage);
}

/// Posts to a Slack incoming webhook, or logs the payload when none is set.
pub struct WebhookSink {
    client: Option<SlackClient>,
    health: HealthReporter,
}

impl WebhookSink {
    pub fn new(client: Option<SlackClient>, health: HealthReporter) -> Self {
        Self { client, health }
    }
}

#[async_trait]
impl MessageSink for WebhookSink {
    async fn deliver(&self, message: &SlackMessage) {
        let Some(client) = &self.client else {
            match serde_json::to_string(message) {
                Ok(payload) => info!(payload = %payload, "No webhook configured, logging message"),
                Err(e) => warn!(error = %e, "Failed to serialize message"),
            }
            return;
        };

        match client.post(message).await {
            Ok(()) => self.health.record(Activity::SlackPost),
            Err(e) => warn!(error = %e, "Webhook delivery failed"),
        }
    }
}
