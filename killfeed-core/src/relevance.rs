//! Decides whether a killmail concerns the watched organizations.

use killfeed_sdk::objects::Killmail;
use std::collections::HashSet;

/// Corporation and alliance IDs of interest.
///
/// An empty set means every killmail is relevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSet(HashSet<i64>);

impl WatchSet {
    fn contains_any(&self, ids: impl IntoIterator<Item = Option<i64>>) -> bool {
        ids.into_iter().flatten().any(|id| self.0.contains(&id))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<i64> for WatchSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceReason {
    /// A watched organization lost the ship.
    Victim,
    /// A watched organization took part in the kill.
    Attacker,
    /// No watch list is configured.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    NotRelevant,
    Relevant(RelevanceReason),
}

/// Classify a killmail against the watch set.
///
/// The victim side is checked before the attackers, so a kill where a
/// watched organization appears on both sides counts as a loss.
pub fn classify(killmail: &Killmail, watch: &WatchSet) -> Relevance {
    if watch.is_empty() {
        return Relevance::Relevant(RelevanceReason::All);
    }

    let victim = &killmail.victim;
    if watch.contains_any([Some(victim.corporation_id), victim.alliance_id]) {
        return Relevance::Relevant(RelevanceReason::Victim);
    }

    let attacked = killmail
        .attackers
        .iter()
        .any(|a| watch.contains_any([a.corporation_id, a.alliance_id]));
    if attacked {
        return Relevance::Relevant(RelevanceReason::Attacker);
    }

    Relevance::NotRelevant
}
