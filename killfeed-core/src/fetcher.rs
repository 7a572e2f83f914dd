use async_trait::async_trait;
use killfeed_sdk::client::{ClientError, EsiClient};
use killfeed_sdk::objects::Killmail;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::health::{Activity, HealthReporter};

/// Where full killmail bodies come from.
#[async_trait]
pub trait KillmailSource: Send + Sync {
    async fn fetch_killmail(&self, kill_id: i64, hash: &str) -> Result<Killmail, ClientError>;
}

#[async_trait]
impl KillmailSource for EsiClient {
    async fn fetch_killmail(&self, kill_id: i64, hash: &str) -> Result<Killmail, ClientError> {
        self.get_killmail(kill_id, hash).await
    }
}

/// Resolves RedisQ kill references into full killmails.
///
/// Killmails are immutable once published, so successful fetches are
/// memoized by `(kill_id, hash)` for the life of the process.
pub struct KillmailFetcher {
    source: Arc<dyn KillmailSource>,
    health: HealthReporter,
    memo: RwLock<HashMap<(i64, String), Killmail>>,
}

impl KillmailFetcher {
    pub fn new(source: Arc<dyn KillmailSource>, health: HealthReporter) -> Self {
        Self {
            source,
            health,
            memo: RwLock::default(),
        }
    }

    /// Fetch a killmail, or `None` if ESI could not provide it.
    pub async fn fetch(&self, kill_id: i64, hash: &str) -> Option<Killmail> {
        let key = (kill_id, hash.to_string());
        if let Some(killmail) = self.memo.read().await.get(&key) {
            return Some(killmail.clone());
        }

        match self.source.fetch_killmail(kill_id, hash).await {
            Ok(killmail) => {
                self.health.record(Activity::EsiCall);
                self.memo.write().await.insert(key, killmail.clone());
                Some(killmail)
            }
            Err(e) => {
                warn!(kill_id, error = %e, "Failed to fetch killmail");
                None
            }
        }
    }
}
