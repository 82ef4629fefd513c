// src/models/scouting.rs
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Match lifecycle, collapsed to the states the report cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Ongoing,
    Finished,
    Unknown,
}

impl MatchStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "FINISHED" => MatchStatus::Finished,
            "SCHEDULED" => MatchStatus::Scheduled,
            "ONGOING" | "READY" | "VOTING" | "CONFIGURING" | "MANUAL_RESULT" => {
                MatchStatus::Ongoing
            }
            _ => MatchStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Tie,
    #[default]
    Unknown,
}

/// One reconciled match from our team's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub match_id: String,
    pub opponent: String,
    pub status: MatchStatus,
    pub picked: Vec<String>,
    pub banned: Vec<String>,
    pub locations: Vec<String>,
    pub our_score: Option<i64>,
    pub opp_score: Option<i64>,
    pub outcome: Outcome,
    pub url: Option<String>,
    pub sort_key: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MapPlayCount {
    pub played: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub player_id: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faceit_elo: Option<i64>,
}

/// Accumulated per-map totals for one player. K/D and average ADR are
/// derived on read so they can never go stale against the totals.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PlayerMapTotals {
    pub kills: i64,
    pub deaths: i64,
    pub adr_sum: f64,
    pub hs_kills: f64,
    pub rounds: u32,
}

impl PlayerMapTotals {
    pub fn kill_death_ratio(&self) -> Option<f64> {
        if self.deaths > 0 {
            Some(self.kills as f64 / self.deaths as f64)
        } else {
            None
        }
    }

    /// `∞` when the player never died but got kills, `-` when there is no
    /// data at all.
    pub fn kd_display(&self) -> String {
        match self.kill_death_ratio() {
            Some(ratio) => format!("{:.2}", ratio),
            None if self.kills > 0 => "∞".to_string(),
            None => "-".to_string(),
        }
    }

    pub fn average_adr(&self) -> Option<f64> {
        if self.rounds > 0 {
            Some(self.adr_sum / self.rounds as f64)
        } else {
            None
        }
    }

    pub fn adr_display(&self) -> String {
        match self.average_adr() {
            Some(adr) => format!("{:.1}", adr),
            None => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerMapSummary {
    pub player_id: String,
    pub nickname: String,
    pub maps: BTreeMap<String, PlayerMapTotals>,
}

impl PlayerMapSummary {
    /// Totals across all maps, for the card header line.
    pub fn overall(&self) -> PlayerMapTotals {
        let mut total = PlayerMapTotals::default();
        for per_map in self.maps.values() {
            total.kills += per_map.kills;
            total.deaths += per_map.deaths;
            total.adr_sum += per_map.adr_sum;
            total.hs_kills += per_map.hs_kills;
            total.rounds += per_map.rounds;
        }
        total
    }
}

/// Everything the scouting view needs for one (team, championship) query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamScoutingReport {
    pub rows: Vec<MatchReport>,
    pub map_stats: BTreeMap<String, MapPlayCount>,
    pub locations: BTreeMap<String, u32>,
    pub competition_name: Option<String>,
    pub players: Vec<PlayerView>,
    pub player_map_stats: Vec<PlayerMapSummary>,
    pub generated_at: DateTime<Utc>,
}

impl TeamScoutingReport {
    pub fn empty_with_players(players: Vec<PlayerView>) -> Self {
        Self {
            rows: Vec::new(),
            map_stats: BTreeMap::new(),
            locations: BTreeMap::new(),
            competition_name: None,
            players,
            player_map_stats: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapTendency {
    pub map: String,
    pub picks: u32,
    pub bans: u32,
    pub pick_rate: f64,
    pub ban_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VetoTendencies {
    pub matches_tracked: u32,
    pub maps: Vec<MapTendency>,
    pub likely_permabans: Vec<String>,
    pub likely_comfort_picks: Vec<String>,
    pub top_comfort_pick: Option<MapTendency>,
}
