//! Websocket feed driver.
//!
//! Connects to the kill stream, subscribes once per connection and hands
//! every pushed killmail to the [`KillPipeline`]. A dropped connection is
//! retried after a fixed delay, forever.

use kanau::processor::Processor;
use killfeed_sdk::client::{ClientError, KillstreamClient};
use killfeed_sdk::objects::{KILLSTREAM_CHANNEL, Killmail};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::kill_pipeline::{IncomingKill, KillPipeline};
use crate::health::{Activity, HealthReporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Disconnected,
    Connecting,
    Subscribed,
}

pub struct KillstreamListener {
    client: KillstreamClient,
    pipeline: Arc<KillPipeline>,
    health: HealthReporter,
    reconnect_delay: Duration,
    state_tx: watch::Sender<StreamState>,
}

impl KillstreamListener {
    pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

    pub fn new(client: KillstreamClient, pipeline: Arc<KillPipeline>, health: HealthReporter) -> Self {
        let (state_tx, _) = watch::channel(StreamState::Disconnected);
        Self {
            client,
            pipeline,
            health,
            reconnect_delay: Self::DEFAULT_RECONNECT_DELAY,
            state_tx,
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Observe connection state transitions.
    pub fn state(&self) -> watch::Receiver<StreamState> {
        self.state_tx.subscribe()
    }

    /// Run until the task is dropped. Never returns on its own.
    pub async fn run(self) {
        info!(url = %self.client.url(), "KillstreamListener started");

        loop {
            match self.session().await {
                Ok(()) => info!("Kill stream closed"),
                Err(e) => error!(error = %e, "Kill stream error"),
            }
            self.state_tx.send_replace(StreamState::Disconnected);

            info!(delay = ?self.reconnect_delay, "Reconnecting to kill stream");
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    async fn session(&self) -> Result<(), ClientError> {
        self.state_tx.send_replace(StreamState::Connecting);
        let mut connection = self.client.connect().await?;
        connection.subscribe(KILLSTREAM_CHANNEL).await?;
        self.state_tx.send_replace(StreamState::Subscribed);
        info!(channel = KILLSTREAM_CHANNEL, "Subscribed to kill stream");

        while let Some(frame) = connection.next_text().await? {
            self.handle_frame(&frame).await;
        }
        Ok(())
    }

    async fn handle_frame(&self, frame: &str) {
        self.health.record(Activity::Poll);

        let killmail: Killmail = match serde_json::from_str(frame) {
            Ok(killmail) => killmail,
            Err(e) => {
                warn!(error = %e, "Failed to decode kill stream frame");
                return;
            }
        };
        let kill_id = killmail.killmail_id;
        debug!(kill_id, "Received killmail");

        if let Err(e) = self.pipeline.process(IncomingKill::from_stream(killmail)).await {
            warn!(kill_id, error = %e, "Failed to process killmail");
        }
    }
}
