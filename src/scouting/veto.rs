// src/scouting/veto.rs
//
// Which maps were picked and which were banned, per match. The democracy
// veto history is authoritative when present; otherwise the voting block
// embedded in the match payload is partitioned by pick-list membership,
// and as a last resort the map recorded in the round statistics stands in
// for matches whose veto was never captured.
use std::collections::HashSet;

use crate::models::faceit::{DemocracyHistory, MatchStats, RawMatch, VotingCategory};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VetoResult {
    pub picked: Vec<String>,
    pub banned: Vec<String>,
    pub locations: Vec<String>,
}

impl VetoResult {
    pub fn is_empty(&self) -> bool {
        self.picked.is_empty() && self.banned.is_empty() && self.locations.is_empty()
    }
}

pub fn resolve_veto(
    m: &RawMatch,
    history: Option<&DemocracyHistory>,
    stats: Option<&MatchStats>,
) -> VetoResult {
    if let Some(history) = history {
        let from_history = veto_from_history(history);
        if !from_history.is_empty() {
            return from_history;
        }
    }

    let mut result = veto_from_embedded(m);

    // matches played before veto capture existed still know their map
    if result.picked.is_empty() {
        if let Some(map_name) = stats.and_then(MatchStats::primary_map_name) {
            result.picked.push(map_name);
        }
    }

    result
}

pub fn veto_from_history(history: &DemocracyHistory) -> VetoResult {
    let mut result = VetoResult::default();
    if let Some(map) = history.map_category() {
        let (picked, banned) = partition_entities(map);
        result.picked = picked;
        result.banned = banned;
    }
    if let Some(location) = history.location_category() {
        let (picked, _) = partition_entities(location);
        result.locations = picked;
    }
    result
}

pub fn veto_from_embedded(m: &RawMatch) -> VetoResult {
    let mut result = VetoResult::default();
    let Some(voting) = m.voting.as_ref() else {
        return result;
    };
    if let Some(map) = voting.map.as_ref() {
        let (picked, banned) = partition_entities(map);
        result.picked = picked;
        result.banned = banned;
    }
    if let Some(location) = voting.location.as_ref() {
        let (picked, _) = partition_entities(location);
        result.locations = picked;
    }
    result
}

/// Split a voting category's entities into picked and banned by testing
/// each entity's resolved identifier against the pick list. The same
/// identifier doubles as the display name.
fn partition_entities(category: &VotingCategory) -> (Vec<String>, Vec<String>) {
    if category.entities.is_empty() {
        return (Vec::new(), Vec::new());
    }
    let pick_ids: HashSet<String> = category.pick_ids().into_iter().collect();

    let mut picked = Vec::new();
    let mut banned = Vec::new();
    for entity in &category.entities {
        let Some(identifier) = entity.identifier() else {
            continue;
        };
        if pick_ids.contains(identifier) {
            picked.push(identifier.to_string());
        } else {
            banned.push(identifier.to_string());
        }
    }
    (dedup_preserving_order(picked), dedup_preserving_order(banned))
}

fn dedup_preserving_order(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
