//! Turns a relevant killmail into a Slack payload.
//!
//! Attacker-side facts are derived first so a malformed killmail is rejected
//! before any ESI traffic. All name lookups are then issued together against
//! the reference cache.

mod summary;

pub use summary::{DominantShip, KillSummary};

use killfeed_sdk::objects::{Accessory, Attachment, Block, Killmail, SlackMessage, Text, Zkb};
use std::sync::Arc;
use thiserror::Error;

use crate::reference::ReferenceCache;
use crate::relevance::{Relevance, RelevanceReason};
use crate::utils::format::{format_isk, format_kill_time};

const KILL_COLOR: &str = "#00cc00";
const LOSS_COLOR: &str = "#cc0000";
const ZKILL_BASE: &str = "https://zkillboard.com";
const IMAGE_BASE: &str = "https://images.evetech.net";

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("killmail {kill_id} has no attackers")]
    NoAttackers { kill_id: i64 },

    #[error("killmail {kill_id} has no final blow attacker")]
    NoFinalBlow { kill_id: i64 },

    #[error("failed to format kill time: {0}")]
    TimeFormat(#[from] time::error::Format),
}

pub struct MessageComposer {
    cache: Arc<ReferenceCache>,
}

impl MessageComposer {
    pub fn new(cache: Arc<ReferenceCache>) -> Self {
        Self { cache }
    }

    /// Build the notification for `killmail`.
    ///
    /// `zkb` supplies the estimated value; without it the value line reads
    /// `unknown`.
    pub async fn compose(
        &self,
        killmail: &Killmail,
        relevance: Relevance,
        zkb: Option<&Zkb>,
    ) -> Result<SlackMessage, ComposeError> {
        let summary = KillSummary::derive(killmail)?;
        let time = format_kill_time(killmail.killmail_time)?;
        let victim = &killmail.victim;
        let cache = &self.cache;

        let (
            victim_character,
            corporation,
            alliance,
            ship,
            system,
            final_blow,
            top_damage,
            dominant_ship,
        ) = tokio::join!(
            cache.character(victim.character_id),
            cache.corporation(Some(victim.corporation_id)),
            cache.alliance(victim.alliance_id),
            cache.ship_type(Some(victim.ship_type_id)),
            cache.solar_system(Some(killmail.solar_system_id)),
            cache.character(summary.final_blow.character_id),
            cache.character(summary.top_damage.character_id),
            cache.ship_type(summary.dominant_ship.ship_type_id),
        );

        let mut affiliation = format!(
            "[<{ZKILL_BASE}/corporation/{}/|{}>]",
            victim.corporation_id, corporation.name
        );
        if let Some(alliance_id) = victim.alliance_id {
            affiliation.push_str(&format!(
                " [<{ZKILL_BASE}/alliance/{alliance_id}/|{}>]",
                alliance.name
            ));
        }

        let victim_name = match victim.character_id {
            Some(id) => format!("<{ZKILL_BASE}/character/{id}/|{}>", victim_character.name),
            None => victim_character.name,
        };

        let headline = format!(
            "_{time}_ <{ZKILL_BASE}/kill/{}/|*zKill*>\n{victim_name} {affiliation}\n{} in {}",
            killmail.killmail_id, ship.name, system.name
        );

        let value = match zkb.and_then(|z| z.total_value) {
            Some(total) => format!("Estimated value: {} ISK", format_isk(total)),
            None => "Estimated value: unknown".to_string(),
        };

        let color = match relevance {
            Relevance::Relevant(RelevanceReason::Attacker) => KILL_COLOR,
            _ => LOSS_COLOR,
        };

        Ok(SlackMessage {
            attachments: vec![Attachment {
                color: color.to_string(),
                blocks: vec![
                    Block::Section {
                        text: Text::markdown(headline),
                        fields: vec![
                            Text::markdown("*Final Blow*"),
                            Text::markdown(final_blow.name),
                            Text::markdown("*Top Damage*"),
                            Text::markdown(top_damage.name),
                            Text::markdown("*Attacker Ship*"),
                            Text::markdown(format!(
                                "{} ({})",
                                dominant_ship.name, summary.dominant_ship.count
                            )),
                        ],
                        accessory: Some(Accessory::Image {
                            image_url: format!(
                                "{IMAGE_BASE}/types/{}/icon?size=128",
                                victim.ship_type_id
                            ),
                            alt_text: ship.name,
                        }),
                    },
                    Block::Section {
                        text: Text::markdown(value),
                        fields: Vec::new(),
                        accessory: None,
                    },
                ],
            }],
        })
    }
}
