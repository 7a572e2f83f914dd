use kanau::processor::Processor;
use killfeed_sdk::objects::{Killmail, Zkb};
use std::sync::Arc;
use tracing::{debug, info};

use crate::composer::{ComposeError, MessageComposer};
use crate::relevance::{Relevance, RelevanceReason, WatchSet, classify};
use crate::sink::MessageSink;

/// A killmail together with the zKillboard metadata it arrived with.
#[derive(Debug, Clone)]
pub struct IncomingKill {
    pub killmail: Killmail,
    pub zkb: Option<Zkb>,
}

impl IncomingKill {
    /// Kill stream frames embed `zkb` in the killmail body.
    pub fn from_stream(mut killmail: Killmail) -> Self {
        let zkb = killmail.zkb.take();
        Self { killmail, zkb }
    }

    /// RedisQ delivers `zkb` next to the kill ID; the body comes from ESI.
    pub fn from_queue(killmail: Killmail, zkb: Zkb) -> Self {
        Self {
            killmail,
            zkb: Some(zkb),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    Ignored,
    Delivered(RelevanceReason),
}

/// Classify, compose and deliver. Both feed drivers end up here.
pub struct KillPipeline {
    watch: WatchSet,
    composer: MessageComposer,
    sink: Arc<dyn MessageSink>,
}

impl KillPipeline {
    pub fn new(watch: WatchSet, composer: MessageComposer, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            watch,
            composer,
            sink,
        }
    }
}

impl Processor<IncomingKill> for KillPipeline {
    type Output = KillOutcome;
    type Error = ComposeError;

    #[tracing::instrument(skip_all, fields(kill_id = kill.killmail.killmail_id))]
    async fn process(&self, kill: IncomingKill) -> Result<KillOutcome, ComposeError> {
        let Relevance::Relevant(reason) = classify(&kill.killmail, &self.watch) else {
            debug!("Killmail not relevant");
            return Ok(KillOutcome::Ignored);
        };

        let message = self
            .composer
            .compose(&kill.killmail, Relevance::Relevant(reason), kill.zkb.as_ref())
            .await?;
        self.sink.deliver(&message).await;

        info!(reason = ?reason, "Delivered kill notification");
        Ok(KillOutcome::Delivered(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthReporter;
    use crate::reference::ReferenceCache;
    use crate::testing::{FakeReferenceSource, RecordingSink, attacker, sample_killmail};

    fn pipeline(watch: WatchSet) -> (KillPipeline, Arc<RecordingSink>) {
        let source = Arc::new(FakeReferenceSource::default());
        let cache = Arc::new(ReferenceCache::new(source, HealthReporter::new(false)));
        let sink = Arc::new(RecordingSink::default());
        (
            KillPipeline::new(watch, MessageComposer::new(cache), sink.clone()),
            sink,
        )
    }

    #[tokio::test]
    async fn test_irrelevant_kill_is_not_delivered() {
        let (pipeline, sink) = pipeline([42].into_iter().collect());
        let outcome = pipeline
            .process(IncomingKill::from_stream(sample_killmail(1)))
            .await
            .unwrap();

        assert_eq!(outcome, KillOutcome::Ignored);
        assert!(sink.messages().is_empty());
    }

    #[tokio::test]
    async fn test_attacker_kill_is_delivered_in_green() {
        let (pipeline, sink) = pipeline([4000].into_iter().collect());
        let outcome = pipeline
            .process(IncomingKill::from_stream(sample_killmail(1)))
            .await
            .unwrap();

        assert_eq!(outcome, KillOutcome::Delivered(RelevanceReason::Attacker));
        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].attachments[0].color, "#00cc00");
    }

    #[tokio::test]
    async fn test_compose_failure_skips_delivery() {
        let (pipeline, sink) = pipeline(WatchSet::default());
        let mut killmail = sample_killmail(3);
        killmail.attackers = vec![attacker(1, Some(1), false)];

        let result = pipeline.process(IncomingKill::from_stream(killmail)).await;

        assert!(matches!(result, Err(ComposeError::NoFinalBlow { kill_id: 3 })));
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn test_stream_kill_carries_embedded_zkb() {
        let mut killmail = sample_killmail(1);
        killmail.zkb = Some(Zkb {
            hash: "abc".to_string(),
            ..Default::default()
        });

        let kill = IncomingKill::from_stream(killmail);
        assert!(kill.killmail.zkb.is_none());
        assert_eq!(kill.zkb.map(|z| z.hash), Some("abc".to_string()));
    }
}
