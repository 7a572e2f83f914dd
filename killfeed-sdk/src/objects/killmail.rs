//! Killmail body as served by ESI and pushed by the zKillboard kill stream.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single ship destruction.
///
/// The ESI body never carries `zkb`; the kill stream attaches it to each
/// pushed killmail, and the RedisQ feed delivers it next to the kill ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Killmail {
    pub killmail_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub killmail_time: OffsetDateTime,
    pub solar_system_id: i64,
    pub victim: Victim,
    #[serde(default)]
    pub attackers: Vec<Attacker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zkb: Option<Zkb>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Victim {
    pub character_id: Option<i64>,
    pub corporation_id: i64,
    pub alliance_id: Option<i64>,
    pub ship_type_id: i64,
    #[serde(default)]
    pub damage_taken: i64,
}

/// One participant on the attacking side.
///
/// NPCs and structures have no character, and some have no corporation
/// or ship, so every ID is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attacker {
    pub character_id: Option<i64>,
    pub corporation_id: Option<i64>,
    pub alliance_id: Option<i64>,
    pub ship_type_id: Option<i64>,
    pub weapon_type_id: Option<i64>,
    #[serde(default)]
    pub damage_done: i64,
    #[serde(default)]
    pub final_blow: bool,
}

/// zKillboard metadata travelling alongside a killmail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zkb {
    /// Verification hash required to fetch the killmail body from ESI.
    #[serde(default)]
    pub hash: String,
    #[serde(rename = "totalValue", default)]
    pub total_value: Option<Decimal>,
    #[serde(rename = "locationID", default)]
    pub location_id: Option<i64>,
    #[serde(rename = "fittedValue", default)]
    pub fitted_value: Option<Decimal>,
    #[serde(rename = "droppedValue", default)]
    pub dropped_value: Option<Decimal>,
    #[serde(rename = "destroyedValue", default)]
    pub destroyed_value: Option<Decimal>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub npc: bool,
    #[serde(default)]
    pub solo: bool,
    #[serde(default)]
    pub awox: bool,
}
