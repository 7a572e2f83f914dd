//! ESI reference records used to put names on killmail IDs.
//!
//! Only the fields the notifier reads are modelled; everything else in
//! the ESI response is ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The five kinds of reference data resolved for a killmail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Character,
    ShipType,
    SolarSystem,
    Corporation,
    Alliance,
}

impl EntityKind {
    /// ESI path for a record of this kind, relative to the versioned root.
    pub fn path(self, id: i64) -> String {
        match self {
            EntityKind::Character => format!("characters/{id}/"),
            EntityKind::ShipType => format!("universe/types/{id}/"),
            EntityKind::SolarSystem => format!("universe/systems/{id}/"),
            EntityKind::Corporation => format!("corporations/{id}/"),
            EntityKind::Alliance => format!("alliances/{id}/"),
        }
    }

    /// Name shown when a record is missing or could not be fetched.
    pub fn placeholder_name(self) -> &'static str {
        match self {
            EntityKind::Character | EntityKind::Corporation => "Unknown",
            EntityKind::ShipType => "Unknown Ship",
            EntityKind::SolarSystem => "Unknown System",
            EntityKind::Alliance => "Unknown Alliance",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Character => write!(f, "character"),
            EntityKind::ShipType => write!(f, "ship_type"),
            EntityKind::SolarSystem => write!(f, "solar_system"),
            EntityKind::Corporation => write!(f, "corporation"),
            EntityKind::Alliance => write!(f, "alliance"),
        }
    }
}

/// Common behaviour of the typed ESI reference records.
pub trait ReferenceRecord: DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn name(&self) -> &str;

    /// A record carrying only a name.
    fn named(name: impl Into<String>) -> Self;

    /// The fixed stand-in returned for absent IDs and failed fetches.
    fn placeholder() -> Self {
        Self::named(Self::KIND.placeholder_name())
    }
}

/// `GET /characters/{character_id}/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub corporation_id: Option<i64>,
    pub alliance_id: Option<i64>,
    pub security_status: Option<f64>,
}

/// `GET /universe/types/{type_id}/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipType {
    pub name: String,
    pub group_id: Option<i64>,
}

/// `GET /universe/systems/{system_id}/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolarSystem {
    pub name: String,
    pub constellation_id: Option<i64>,
    pub security_status: Option<f64>,
}

/// `GET /corporations/{corporation_id}/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corporation {
    pub name: String,
    pub ticker: Option<String>,
    pub alliance_id: Option<i64>,
}

/// `GET /alliances/{alliance_id}/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alliance {
    pub name: String,
    pub ticker: Option<String>,
}

impl ReferenceRecord for Character {
    const KIND: EntityKind = EntityKind::Character;

    fn name(&self) -> &str {
        &self.name
    }

    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl ReferenceRecord for ShipType {
    const KIND: EntityKind = EntityKind::ShipType;

    fn name(&self) -> &str {
        &self.name
    }

    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl ReferenceRecord for SolarSystem {
    const KIND: EntityKind = EntityKind::SolarSystem;

    fn name(&self) -> &str {
        &self.name
    }

    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl ReferenceRecord for Corporation {
    const KIND: EntityKind = EntityKind::Corporation;

    fn name(&self) -> &str {
        &self.name
    }

    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl ReferenceRecord for Alliance {
    const KIND: EntityKind = EntityKind::Alliance;

    fn name(&self) -> &str {
        &self.name
    }

    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
