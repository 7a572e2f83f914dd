//! Wiring of the shared components both feed drivers run on.

use crate::config::Config;
use killfeed_core::composer::MessageComposer;
use killfeed_core::fetcher::KillmailFetcher;
use killfeed_core::health::HealthReporter;
use killfeed_core::processors::{KillPipeline, KillstreamListener, QueuePoller};
use killfeed_core::reference::ReferenceCache;
use killfeed_core::sink::WebhookSink;
use killfeed_sdk::client::{ClientError, EsiClient, KillstreamClient, RedisQClient, SlackClient};
use std::sync::Arc;

/// Application state built once at startup.
///
/// The reference cache lives inside the pipeline and is shared by every
/// killmail for the life of the process.
pub struct AppState {
    pub config: Config,
    pub health: HealthReporter,
    esi: EsiClient,
    pipeline: Arc<KillPipeline>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let health = HealthReporter::new(config.slack_webhook_url.is_some());
        let esi = EsiClient::new(config.endpoints.esi.clone(), &config.user_agent)?;

        let cache = Arc::new(ReferenceCache::new(Arc::new(esi.clone()), health.clone()));
        let sink = WebhookSink::new(
            config.slack_webhook_url.clone().map(SlackClient::new),
            health.clone(),
        );
        let pipeline = Arc::new(KillPipeline::new(
            config.watched_ids.iter().copied().collect(),
            MessageComposer::new(cache),
            Arc::new(sink),
        ));

        Ok(Self {
            config,
            health,
            esi,
            pipeline,
        })
    }

    pub fn killstream_listener(&self) -> KillstreamListener {
        KillstreamListener::new(
            KillstreamClient::new(self.config.endpoints.killstream.clone()),
            self.pipeline.clone(),
            self.health.clone(),
        )
    }

    pub fn queue_poller(&self) -> Result<QueuePoller, ClientError> {
        let queue = RedisQClient::new(
            self.config.endpoints.redisq.clone(),
            self.config.queue_id.clone(),
            &self.config.user_agent,
        )?;
        let fetcher = KillmailFetcher::new(Arc::new(self.esi.clone()), self.health.clone());
        Ok(QueuePoller::new(
            Arc::new(queue),
            fetcher,
            self.pipeline.clone(),
            self.health.clone(),
        ))
    }
}
