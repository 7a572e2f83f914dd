//! Liveness bookkeeping for the `/health` endpoint.
//!
//! Every successful network step stamps the time of its activity class.
//! A check compares those stamps against fixed thresholds; any stale
//! class marks the whole process unhealthy so a supervisor can restart it.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Maximum age of the last feed activity (poll response or stream frame).
pub const MAX_POLL_INTERVAL_MS: i64 = 30_000;
/// Maximum age of the last successful ESI call.
pub const MAX_ESI_INTERVAL_MS: i64 = 60_000;
/// Maximum age of the last successful webhook post.
pub const MAX_SLACK_INTERVAL_MS: i64 = 60_000;

/// The activity classes tracked by [`HealthReporter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// The feed answered (RedisQ response or kill stream frame).
    Poll,
    /// An ESI reference or killmail fetch succeeded.
    EsiCall,
    /// A webhook post succeeded.
    SlackPost,
}

/// Shared, lock-free record of the last successful activity per class.
///
/// Cheap to clone; all clones update the same timestamps.
#[derive(Debug, Clone)]
pub struct HealthReporter {
    inner: Arc<HealthInner>,
}

#[derive(Debug)]
struct HealthInner {
    last_poll: AtomicI64,
    last_esi_call: AtomicI64,
    last_slack_post: AtomicI64,
    webhook_configured: bool,
}

impl HealthReporter {
    /// Create a reporter with every timestamp set to now.
    ///
    /// `webhook_configured` controls whether webhook posts are tracked at all.
    pub fn new(webhook_configured: bool) -> Self {
        let now = now_millis();
        Self {
            inner: Arc::new(HealthInner {
                last_poll: AtomicI64::new(now),
                last_esi_call: AtomicI64::new(now),
                last_slack_post: AtomicI64::new(now),
                webhook_configured,
            }),
        }
    }

    pub fn record(&self, activity: Activity) {
        self.record_at(activity, now_millis());
    }

    pub fn check(&self) -> HealthReport {
        self.check_at(now_millis())
    }

    fn slot(&self, activity: Activity) -> &AtomicI64 {
        match activity {
            Activity::Poll => &self.inner.last_poll,
            Activity::EsiCall => &self.inner.last_esi_call,
            Activity::SlackPost => &self.inner.last_slack_post,
        }
    }

    pub(crate) fn record_at(&self, activity: Activity, at_ms: i64) {
        self.slot(activity).store(at_ms, Ordering::Relaxed);
    }

    fn check_at(&self, now_ms: i64) -> HealthReport {
        let since_poll = now_ms - self.inner.last_poll.load(Ordering::Relaxed);
        let since_esi = now_ms - self.inner.last_esi_call.load(Ordering::Relaxed);

        let redisq = FeedHealth {
            status: HealthStatus::within(since_poll, MAX_POLL_INTERVAL_MS),
            last_poll: since_poll,
        };
        let esi = EsiHealth {
            status: HealthStatus::within(since_esi, MAX_ESI_INTERVAL_MS),
            last_call: since_esi,
        };
        let slack = self.inner.webhook_configured.then(|| {
            let since_post = now_ms - self.inner.last_slack_post.load(Ordering::Relaxed);
            SlackHealth {
                status: HealthStatus::within(since_post, MAX_SLACK_INTERVAL_MS),
                last_post: since_post,
            }
        });

        let all_healthy = redisq.status == HealthStatus::Healthy
            && esi.status == HealthStatus::Healthy
            && slack
                .as_ref()
                .is_none_or(|s| s.status == HealthStatus::Healthy);

        HealthReport {
            status: if all_healthy {
                HealthStatus::Healthy
            } else {
                HealthStatus::Unhealthy
            },
            details: HealthDetails { redisq, esi, slack },
        }
    }
}

pub(crate) fn now_millis() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    fn within(elapsed_ms: i64, max_ms: i64) -> Self {
        if elapsed_ms > max_ms {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Healthy
        }
    }
}

/// Body of the `/health` response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub details: HealthDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDetails {
    pub redisq: FeedHealth,
    pub esi: EsiHealth,
    pub slack: Option<SlackHealth>,
}

/// Milliseconds since the feed last answered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedHealth {
    pub status: HealthStatus,
    pub last_poll: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EsiHealth {
    pub status: HealthStatus,
    pub last_call: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackHealth {
    pub status: HealthStatus,
    pub last_post: i64,
}
