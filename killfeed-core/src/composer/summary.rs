use killfeed_sdk::objects::{Attacker, Killmail};

use super::ComposeError;

/// The most common ship type among the attackers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DominantShip {
    /// `None` groups attackers that reported no ship.
    pub ship_type_id: Option<i64>,
    pub count: usize,
}

/// Attacker-side facts shown in a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct KillSummary<'a> {
    pub final_blow: &'a Attacker,
    pub top_damage: &'a Attacker,
    pub dominant_ship: DominantShip,
}

impl<'a> KillSummary<'a> {
    pub fn derive(killmail: &'a Killmail) -> Result<Self, ComposeError> {
        let kill_id = killmail.killmail_id;
        let attackers = killmail.attackers.as_slice();

        let Some(first) = attackers.first() else {
            return Err(ComposeError::NoAttackers { kill_id });
        };
        let final_blow = attackers
            .iter()
            .find(|a| a.final_blow)
            .ok_or(ComposeError::NoFinalBlow { kill_id })?;

        // Strict comparison keeps the earliest attacker on ties.
        let top_damage = attackers.iter().fold(first, |best, a| {
            if a.damage_done > best.damage_done { a } else { best }
        });

        Ok(Self {
            final_blow,
            top_damage,
            dominant_ship: dominant_ship(attackers),
        })
    }
}

fn dominant_ship(attackers: &[Attacker]) -> DominantShip {
    // Kept in first-seen order so ties resolve to the earliest ship.
    let mut tally: Vec<DominantShip> = Vec::new();
    for attacker in attackers {
        match tally
            .iter_mut()
            .find(|entry| entry.ship_type_id == attacker.ship_type_id)
        {
            Some(entry) => entry.count += 1,
            None => tally.push(DominantShip {
                ship_type_id: attacker.ship_type_id,
                count: 1,
            }),
        }
    }

    tally.into_iter().fold(
        DominantShip {
            ship_type_id: None,
            count: 0,
        },
        |best, entry| if entry.count > best.count { entry } else { best },
    )
}
