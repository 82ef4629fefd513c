// src/models/veto_log.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VetoActionType {
    Pick,
    Ban,
}

impl VetoActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VetoActionType::Pick => "pick",
            VetoActionType::Ban => "ban",
        }
    }

    pub fn from_str_loose(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "pick" => Some(VetoActionType::Pick),
            "ban" => Some(VetoActionType::Ban),
            _ => None,
        }
    }
}

/// One stored annotation row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VetoLogRow {
    pub team_id: String,
    pub team_name: String,
    pub match_id: String,
    pub map: String,
    pub action_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManualVetoAction {
    pub map: String,
    #[serde(rename = "type")]
    pub action: VetoActionType,
}

/// All annotations for one match of one scouted team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualMatchVeto {
    pub match_id: String,
    pub team_id: String,
    pub team_name: String,
    pub actions: Vec<ManualVetoAction>,
}

/// Body of the upsert request; the (team, match) key comes from the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertVetoLogRequest {
    pub team_name: String,
    pub actions: Vec<ManualVetoAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManualMapSummary {
    pub map: String,
    pub picks: u32,
    pub bans: u32,
    pub total_matches: u32,
    pub pick_rate: f64,
    pub ban_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamVetoSummary {
    pub matches_tracked: u32,
    pub maps: Vec<ManualMapSummary>,
    pub likely_permabans: Vec<String>,
    pub likely_comfort_picks: Vec<String>,
}

/// Normalize free-form map names onto the active pool. Returns `None` for
/// rows that are server locations rather than maps.
pub fn normalize_map_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();

    const POOL: [(&str, &str); 9] = [
        ("mirage", "Mirage"),
        ("inferno", "Inferno"),
        ("nuke", "Nuke"),
        ("ancient", "Ancient"),
        ("anubis", "Anubis"),
        ("vertigo", "Vertigo"),
        ("dust", "Dust2"),
        ("overpass", "Overpass"),
        ("train", "Train"),
    ];
    for (needle, canonical) in POOL {
        if lower.contains(needle) {
            return Some(canonical.to_string());
        }
    }

    const LOCATION_NOISE: [&str; 5] = ["chicago", "dallas", "denver", "newyork", "new york"];
    if LOCATION_NOISE.iter().any(|noise| lower.contains(noise)) {
        return None;
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_maps_onto_the_pool() {
        assert_eq!(normalize_map_name("de_mirage"), Some("Mirage".to_string()));
        assert_eq!(normalize_map_name("  DUST II "), Some("Dust2".to_string()));
        assert_eq!(normalize_map_name("Train"), Some("Train".to_string()));
    }

    #[test]
    fn normalization_rejects_location_noise_and_blanks() {
        assert_eq!(normalize_map_name("Chicago"), None);
        assert_eq!(normalize_map_name("New York"), None);
        assert_eq!(normalize_map_name("   "), None);
    }

    #[test]
    fn unknown_names_pass_through_trimmed() {
        assert_eq!(normalize_map_name(" Cache "), Some("Cache".to_string()));
    }

    #[test]
    fn action_type_round_trips_through_storage_text() {
        assert_eq!(
            VetoActionType::from_str_loose(VetoActionType::Pick.as_str()),
            Some(VetoActionType::Pick)
        );
        assert_eq!(VetoActionType::from_str_loose("BAN"), Some(VetoActionType::Ban));
        assert_eq!(VetoActionType::from_str_loose("veto"), None);
    }
}
