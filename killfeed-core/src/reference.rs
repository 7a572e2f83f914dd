//! Read-through cache over ESI reference data.
//!
//! Names of characters, ship types, systems, corporations and alliances
//! barely ever change, so once a record is fetched it is kept for the life
//! of the process. Nothing is evicted and nothing is refreshed.
//!
//! Lookups never fail from the caller's point of view: an absent ID or a
//! failed fetch yields the kind's placeholder record. Failures are not
//! remembered, so the next lookup for the same ID tries ESI again.

use async_trait::async_trait;
use killfeed_sdk::client::{ClientError, EsiClient};
use killfeed_sdk::objects::{
    Alliance, Character, Corporation, EntityKind, ReferenceRecord, ShipType, SolarSystem,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::health::{Activity, HealthReporter};

/// Where reference records come from on a cache miss.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Fetch the raw JSON record of `kind` with the given `id`.
    async fn fetch_reference(
        &self,
        kind: EntityKind,
        id: i64,
    ) -> Result<serde_json::Value, ClientError>;
}

#[async_trait]
impl ReferenceSource for EsiClient {
    async fn fetch_reference(
        &self,
        kind: EntityKind,
        id: i64,
    ) -> Result<serde_json::Value, ClientError> {
        self.get_reference(kind, id).await
    }
}

type EntityTable<T> = RwLock<HashMap<i64, T>>;

/// Process-lifetime cache of the five reference kinds.
///
/// Concurrent misses for the same ID may both fetch; the second write
/// stores identical content, so no in-flight deduplication is done.
pub struct ReferenceCache {
    source: Arc<dyn ReferenceSource>,
    health: HealthReporter,
    characters: EntityTable<Character>,
    ship_types: EntityTable<ShipType>,
    solar_systems: EntityTable<SolarSystem>,
    corporations: EntityTable<Corporation>,
    alliances: EntityTable<Alliance>,
}

impl ReferenceCache {
    pub fn new(source: Arc<dyn ReferenceSource>, health: HealthReporter) -> Self {
        Self {
            source,
            health,
            characters: RwLock::default(),
            ship_types: RwLock::default(),
            solar_systems: RwLock::default(),
            corporations: RwLock::default(),
            alliances: RwLock::default(),
        }
    }

    pub async fn character(&self, id: Option<i64>) -> Character {
        self.read_through(&self.characters, id).await
    }

    pub async fn ship_type(&self, id: Option<i64>) -> ShipType {
        self.read_through(&self.ship_types, id).await
    }

    pub async fn solar_system(&self, id: Option<i64>) -> SolarSystem {
        self.read_through(&self.solar_systems, id).await
    }

    pub async fn corporation(&self, id: Option<i64>) -> Corporation {
        self.read_through(&self.corporations, id).await
    }

    pub async fn alliance(&self, id: Option<i64>) -> Alliance {
        self.read_through(&self.alliances, id).await
    }

    async fn read_through<T: ReferenceRecord>(&self, table: &EntityTable<T>, id: Option<i64>) -> T {
        let Some(id) = id else {
            return T::placeholder();
        };

        if let Some(cached) = table.read().await.get(&id) {
            return cached.clone();
        }

        match self.fetch::<T>(id).await {
            Ok(record) => {
                debug!(kind = %T::KIND, id, name = record.name(), "Cached reference record");
                self.health.record(Activity::EsiCall);
                table.write().await.insert(id, record.clone());
                record
            }
            Err(e) => {
                warn!(kind = %T::KIND, id, error = %e, "Reference lookup failed, using placeholder");
                T::placeholder()
            }
        }
    }

    async fn fetch<T: ReferenceRecord>(&self, id: i64) -> Result<T, ClientError> {
        let value = self.source.fetch_reference(T::KIND, id).await?;
        Ok(serde_json::from_value(value)?)
    }
}
