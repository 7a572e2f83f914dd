//! RedisQ feed driver.
//!
//! Each iteration is one typed step: long-poll the queue, resolve the
//! referenced killmail through ESI, run it through the [`KillPipeline`] and
//! report how long to wait before the next request. The loop itself only
//! sleeps and, on a fatal transport error, stops.

use async_trait::async_trait;
use kanau::processor::Processor;
use killfeed_sdk::client::{ClientError, RedisQClient};
use killfeed_sdk::objects::RedisQResponse;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::kill_pipeline::{IncomingKill, KillPipeline};
use crate::fetcher::KillmailFetcher;
use crate::health::{Activity, HealthReporter};

/// Waits between poll requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// After a processed package. RedisQ allows two requests per second.
    pub rate_limit: Duration,
    /// After an empty response.
    pub idle: Duration,
    /// After a failed request.
    pub error_backoff: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            rate_limit: Duration::from_millis(500),
            idle: Duration::from_secs(5 * 60),
            error_backoff: Duration::from_secs(10 * 60),
        }
    }
}

#[async_trait]
pub trait QueueSource: Send + Sync {
    /// Wait for the next package; `package: None` means the queue is empty.
    async fn next_package(&self) -> Result<RedisQResponse, ClientError>;
}

#[async_trait]
impl QueueSource for RedisQClient {
    async fn next_package(&self) -> Result<RedisQResponse, ClientError> {
        self.listen().await
    }
}

/// Decides which poll failures should stop the process.
pub trait FatalErrorPolicy: Send + Sync {
    fn is_fatal(&self, error: &ClientError) -> bool;
}

impl<F> FatalErrorPolicy for F
where
    F: Fn(&ClientError) -> bool + Send + Sync,
{
    fn is_fatal(&self, error: &ClientError) -> bool {
        self(error)
    }
}

/// Treats a dropped connection as fatal, so a supervisor restarts the
/// process with a fresh connection pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionResetPolicy;

const FATAL_IO_KINDS: [ErrorKind; 4] = [
    ErrorKind::ConnectionReset,
    ErrorKind::ConnectionAborted,
    ErrorKind::BrokenPipe,
    ErrorKind::UnexpectedEof,
];

// hyper reports a socket hang-up only through its message
const FATAL_MESSAGES: [&str; 2] = [
    "connection reset",
    "connection closed before message completed",
];

impl FatalErrorPolicy for ConnectionResetPolicy {
    fn is_fatal(&self, error: &ClientError) -> bool {
        // a response body is server text, not a transport condition
        if matches!(error, ClientError::Api { .. }) {
            return false;
        }
        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(error);
        while let Some(e) = current {
            if let Some(io) = e.downcast_ref::<std::io::Error>() {
                if FATAL_IO_KINDS.contains(&io.kind()) {
                    return true;
                }
            }
            let message = e.to_string().to_lowercase();
            if FATAL_MESSAGES.iter().any(|m| message.contains(m)) {
                return true;
            }
            current = e.source();
        }
        false
    }
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error("fatal queue error: {0}")]
    Fatal(#[source] ClientError),
}

/// Outcome of one poll iteration.
#[derive(Debug)]
pub enum PollStep {
    Continue { wait: Duration },
    Backoff { wait: Duration },
    /// Wait out the backoff, then stop the driver.
    Terminate { wait: Duration, error: PollError },
}

impl PollStep {
    pub fn wait(&self) -> Duration {
        match self {
            PollStep::Continue { wait }
            | PollStep::Backoff { wait }
            | PollStep::Terminate { wait, .. } => *wait,
        }
    }
}

pub struct QueuePoller {
    queue: Arc<dyn QueueSource>,
    fetcher: KillmailFetcher,
    pipeline: Arc<KillPipeline>,
    health: HealthReporter,
    policy: Box<dyn FatalErrorPolicy>,
    intervals: PollIntervals,
}

impl QueuePoller {
    pub fn new(
        queue: Arc<dyn QueueSource>,
        fetcher: KillmailFetcher,
        pipeline: Arc<KillPipeline>,
        health: HealthReporter,
    ) -> Self {
        Self {
            queue,
            fetcher,
            pipeline,
            health,
            policy: Box::new(ConnectionResetPolicy),
            intervals: PollIntervals::default(),
        }
    }

    pub fn with_fatal_policy(mut self, policy: impl FatalErrorPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn with_intervals(mut self, intervals: PollIntervals) -> Self {
        self.intervals = intervals;
        self
    }

    /// Poll until a fatal error, which is returned after its backoff.
    pub async fn run(self) -> PollError {
        info!(intervals = ?self.intervals, "QueuePoller started");

        loop {
            let step = self.poll_once().await;
            tokio::time::sleep(step.wait()).await;
            if let PollStep::Terminate { error, .. } = step {
                error!(error = %error, "QueuePoller stopping");
                return error;
            }
        }
    }

    pub async fn poll_once(&self) -> PollStep {
        let response = match self.queue.next_package().await {
            Ok(response) => response,
            Err(e) => {
                let wait = self.intervals.error_backoff;
                let fatal = self.policy.is_fatal(&e);
                error!(error = %e, fatal, delay = ?wait, "Queue poll failed");
                return if fatal {
                    PollStep::Terminate {
                        wait,
                        error: PollError::Fatal(e),
                    }
                } else {
                    PollStep::Backoff { wait }
                };
            }
        };
        self.health.record(Activity::Poll);

        let Some(package) = response.package else {
            debug!(delay = ?self.intervals.idle, "Queue empty");
            return PollStep::Continue {
                wait: self.intervals.idle,
            };
        };

        let kill_id = package.kill_id;
        debug!(kill_id, "Received queue package");

        if let Some(killmail) = self.fetcher.fetch(kill_id, &package.zkb.hash).await {
            let kill = IncomingKill::from_queue(killmail, package.zkb);
            if let Err(e) = self.pipeline.process(kill).await {
                warn!(kill_id, error = %e, "Failed to process killmail");
            }
        }

        PollStep::Continue {
            wait: self.intervals.rate_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::MessageComposer;
    use crate::reference::ReferenceCache;
    use crate::relevance::WatchSet;
    use crate::testing::{
        FakeKillmailSource, FakeReferenceSource, RecordingSink, ScriptedQueue, api_error,
        connection_reset, queued, sample_killmail,
    };
    use killfeed_sdk::objects::{Block, Text};
    use tokio::time::Instant;

    struct Harness {
        poller: QueuePoller,
        queue: Arc<ScriptedQueue>,
        killmails: Arc<FakeKillmailSource>,
        sink: Arc<RecordingSink>,
    }

    fn harness(queue: ScriptedQueue) -> Harness {
        let health = HealthReporter::new(false);
        let queue = Arc::new(queue);
        let killmails = Arc::new(FakeKillmailSource::default());
        let sink = Arc::new(RecordingSink::default());
        let cache = Arc::new(ReferenceCache::new(
            Arc::new(FakeReferenceSource::default()),
            health.clone(),
        ));
        let pipeline = Arc::new(KillPipeline::new(
            WatchSet::default(),
            MessageComposer::new(cache),
            sink.clone(),
        ));
        let poller = QueuePoller::new(
            queue.clone(),
            KillmailFetcher::new(killmails.clone(), health.clone()),
            pipeline,
            health,
        );
        Harness {
            poller,
            queue,
            killmails,
            sink,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_queue_waits_five_minutes() {
        let h = harness(ScriptedQueue::new(vec![Ok(RedisQResponse { package: None })]));

        let step = h.poller.poll_once().await;

        assert!(matches!(step, PollStep::Continue { wait } if wait == Duration::from_secs(300)));
        assert_eq!(h.killmails.calls(), 0);
        assert!(h.sink.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_package_is_fetched_and_delivered() {
        let h = harness(ScriptedQueue::new(vec![Ok(queued(100, "abc", "2500000000"))]));
        h.killmails.insert(sample_killmail(100), "abc");

        let step = h.poller.poll_once().await;

        assert!(matches!(step, PollStep::Continue { wait } if wait == Duration::from_millis(500)));
        assert_eq!(h.killmails.calls(), 1);
        let messages = h.sink.messages();
        assert_eq!(messages.len(), 1);
        let Block::Section { text, .. } = &messages[0].attachments[0].blocks[1];
        assert_eq!(
            text,
            &Text::markdown("Estimated value: 2,500,000,000 ISK")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_skips_event() {
        let h = harness(ScriptedQueue::new(vec![Ok(queued(100, "missing", "1"))]));

        let step = h.poller.poll_once().await;

        assert!(matches!(step, PollStep::Continue { wait } if wait == Duration::from_millis(500)));
        assert_eq!(h.killmails.calls(), 1);
        assert!(h.sink.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_terminates_after_backoff() {
        let h = harness(ScriptedQueue::new(vec![Err(connection_reset())]));
        let started = Instant::now();

        let error = h.poller.run().await;

        assert!(matches!(error, PollError::Fatal(ClientError::WebSocket(_))));
        assert_eq!(started.elapsed(), Duration::from_secs(600));
        assert_eq!(h.queue.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_fatal_error_continues_after_backoff() {
        let h = harness(ScriptedQueue::new(vec![
            Err(api_error(502, "bad gateway")),
            Ok(RedisQResponse { package: None }),
            Err(connection_reset()),
        ]));
        let started = Instant::now();

        h.poller.run().await;

        // 10 min backoff, 5 min idle, 10 min backoff before stopping
        assert_eq!(started.elapsed(), Duration::from_secs(25 * 60));
        assert_eq!(h.queue.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_policy_is_consulted() {
        let h = harness(ScriptedQueue::new(vec![Err(api_error(503, "maintenance"))]));
        let poller = h
            .poller
            .with_fatal_policy(|e: &ClientError| matches!(e, ClientError::Api { .. }));

        let step = poller.poll_once().await;

        assert!(matches!(step, PollStep::Terminate { .. }));
        assert_eq!(step.wait(), Duration::from_secs(600));
    }

    #[test]
    fn test_connection_reset_policy() {
        let policy = ConnectionResetPolicy;

        assert!(policy.is_fatal(&connection_reset()));
        assert!(policy.is_fatal(&ClientError::WebSocket(
            tokio_tungstenite::tungstenite::Error::Io(std::io::Error::from(
                ErrorKind::UnexpectedEof
            ))
        )));

        assert!(!policy.is_fatal(&api_error(502, "bad gateway")));
        assert!(!policy.is_fatal(&api_error(
            500,
            "connection closed before message completed"
        )));
        assert!(!policy.is_fatal(&ClientError::WebSocket(
            tokio_tungstenite::tungstenite::Error::Io(std::io::Error::from(ErrorKind::TimedOut))
        )));
    }
}
