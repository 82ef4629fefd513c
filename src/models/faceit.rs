// src/models/faceit.rs
//
// Serde schemas for the FACEIT payloads we consume. The feed is
// inconsistently populated across matches, so nearly every field is
// optional and each lookup that has more than one known spelling goes
// through a named accessor instead of ad-hoc chaining at the call sites.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::scouting::MatchStatus;

/// Standard `{ "items": [...] }` list wrapper. Some endpoints have been
/// observed returning the bare array instead.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ItemsPage<T> {
    Wrapped {
        #[serde(default = "Vec::new")]
        items: Vec<T>,
    },
    Bare(Vec<T>),
}

impl<T> ItemsPage<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ItemsPage::Wrapped { items } => items,
            ItemsPage::Bare(items) => items,
        }
    }
}

// ---------- championship feed / single match ----------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawMatch {
    #[serde(default)]
    pub match_id: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub competition_id: Option<String>,
    #[serde(default)]
    pub competition_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<i64>,
    #[serde(default)]
    pub started_at: Option<i64>,
    #[serde(default)]
    pub finished_at: Option<i64>,
    #[serde(default)]
    pub faceit_url: Option<String>,
    #[serde(default)]
    pub teams: Option<MatchTeams>,
    #[serde(default)]
    pub results: Option<MatchResults>,
    #[serde(default)]
    pub detailed_results: Vec<DetailedResult>,
    #[serde(default)]
    pub voting: Option<Voting>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactionSide {
    Faction1,
    Faction2,
}

impl RawMatch {
    pub fn match_status(&self) -> MatchStatus {
        self.status
            .as_deref()
            .map(MatchStatus::from_raw)
            .unwrap_or(MatchStatus::Unknown)
    }

    /// Both faction descriptors, or `None` when either is missing. Matches
    /// without both factions are unusable and get discarded upstream.
    pub fn factions(&self) -> Option<(&Faction, &Faction)> {
        let teams = self.teams.as_ref()?;
        Some((teams.faction1.as_ref()?, teams.faction2.as_ref()?))
    }

    /// Which faction slot the given team occupies, if any.
    pub fn side_of(&self, team_id: &str) -> Option<FactionSide> {
        let (f1, f2) = self.factions()?;
        if f1.faction_id.as_deref() == Some(team_id) {
            Some(FactionSide::Faction1)
        } else if f2.faction_id.as_deref() == Some(team_id) {
            Some(FactionSide::Faction2)
        } else {
            None
        }
    }

    pub fn involves_team(&self, team_id: &str) -> bool {
        self.side_of(team_id).is_some()
    }

    /// Ordering key: latest-available timestamp, finished > started >
    /// scheduled, 0 when none are present (sorts as infinitely old).
    pub fn sort_key(&self) -> i64 {
        self.finished_at
            .or(self.started_at)
            .or(self.scheduled_at)
            .unwrap_or(0)
    }

    /// The public match page URL with the `{lang}` placeholder resolved.
    pub fn view_url(&self) -> Option<String> {
        self.faceit_url
            .as_ref()
            .map(|url| url.replace("{lang}", "en"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchTeams {
    #[serde(default)]
    pub faction1: Option<Faction>,
    #[serde(default)]
    pub faction2: Option<Faction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Faction {
    #[serde(default)]
    pub faction_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub leader: Option<String>,
    #[serde(default)]
    pub roster: Vec<TeamMember>,
    #[serde(default)]
    pub players: Vec<TeamMember>,
}

impl Faction {
    /// Roster entries regardless of which key the payload used.
    pub fn lineup(&self) -> &[TeamMember] {
        if !self.roster.is_empty() {
            &self.roster
        } else {
            &self.players
        }
    }

    pub fn player_ids(&self) -> Vec<&str> {
        self.lineup()
            .iter()
            .filter_map(|member| member.identifier())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchResults {
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub score: Option<FactionScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FactionScore {
    #[serde(default)]
    pub faction1: Option<Value>,
    #[serde(default)]
    pub faction2: Option<Value>,
}

impl FactionScore {
    pub fn both(&self) -> Option<(i64, i64)> {
        let f1 = self.faction1.as_ref().and_then(value_as_i64)?;
        let f2 = self.faction2.as_ref().and_then(value_as_i64)?;
        Some((f1, f2))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DetailedResult {
    #[serde(default)]
    pub factions: Option<DetailedFactions>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DetailedFactions {
    #[serde(default)]
    pub faction1: Option<DetailedFactionScore>,
    #[serde(default)]
    pub faction2: Option<DetailedFactionScore>,
}

impl DetailedFactions {
    pub fn both(&self) -> Option<(i64, i64)> {
        let f1 = self
            .faction1
            .as_ref()
            .and_then(|f| f.score.as_ref())
            .and_then(value_as_i64)?;
        let f2 = self
            .faction2
            .as_ref()
            .and_then(|f| f.score.as_ref())
            .and_then(value_as_i64)?;
        Some((f1, f2))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DetailedFactionScore {
    #[serde(default)]
    pub score: Option<Value>,
}

// ---------- embedded voting / democracy veto history ----------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Voting {
    #[serde(default)]
    pub map: Option<VotingCategory>,
    #[serde(default)]
    pub location: Option<VotingCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VotingCategory {
    #[serde(default)]
    pub entities: Vec<VotingEntity>,
    #[serde(default)]
    pub pick: Option<Value>,
    #[serde(default)]
    pub picks: Option<Value>,
}

impl VotingCategory {
    /// Pick identifiers, whichever of the two list spellings is populated.
    /// Entries may be plain id strings or entity-shaped objects.
    pub fn pick_ids(&self) -> Vec<String> {
        let raw = match (&self.picks, &self.pick) {
            (Some(Value::Array(picks)), _) if !picks.is_empty() => picks,
            (_, Some(Value::Array(pick))) => pick,
            _ => return Vec::new(),
        };
        raw.iter().filter_map(pick_ref_id).collect()
    }
}

fn pick_ref_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => ["id", "game_map_id", "game_location_id", "class_name", "guid"]
            .iter()
            .find_map(|key| match obj.get(*key) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                _ => None,
            }),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VotingEntity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub game_map_id: Option<String>,
    #[serde(default)]
    pub game_location_id: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl VotingEntity {
    /// Single fallback chain used both for display and for membership
    /// testing against the pick list: whatever field names the entity is
    /// also the field compared.
    pub fn identifier(&self) -> Option<&str> {
        [
            self.name.as_deref(),
            self.class_name.as_deref(),
            self.game_map_id.as_deref(),
            self.game_location_id.as_deref(),
            self.guid.as_deref(),
            self.id.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
    }
}

/// Veto record from the democracy API. The categories have been seen both
/// at the top level and nested under `voting`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DemocracyHistory {
    #[serde(default)]
    pub map: Option<VotingCategory>,
    #[serde(default)]
    pub location: Option<VotingCategory>,
    #[serde(default)]
    pub voting: Option<Voting>,
}

impl DemocracyHistory {
    pub fn map_category(&self) -> Option<&VotingCategory> {
        self.map
            .as_ref()
            .or_else(|| self.voting.as_ref().and_then(|v| v.map.as_ref()))
    }

    pub fn location_category(&self) -> Option<&VotingCategory> {
        self.location
            .as_ref()
            .or_else(|| self.voting.as_ref().and_then(|v| v.location.as_ref()))
    }
}

// ---------- team / player lookups ----------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamProfile {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub leader: Option<String>,
    #[serde(default)]
    pub roster: Vec<TeamMember>,
    #[serde(default)]
    pub members: Vec<TeamMember>,
    #[serde(default)]
    pub players: Vec<TeamMember>,
}

impl TeamProfile {
    /// The roster under whichever key this payload shipped it.
    pub fn lineup(&self) -> &[TeamMember] {
        if !self.roster.is_empty() {
            &self.roster
        } else if !self.members.is_empty() {
            &self.members
        } else {
            &self.players
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamMember {
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl TeamMember {
    pub fn identifier(&self) -> Option<&str> {
        [
            self.player_id.as_deref(),
            self.user_id.as_deref(),
            self.id.as_deref(),
            self.guid.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
    }

    pub fn display_name(&self) -> Option<&str> {
        [self.nickname.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlayerProfile {
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub games: HashMap<String, PlayerGameInfo>,
    #[serde(default)]
    pub faceit_elo: Option<i64>,
}

impl PlayerProfile {
    /// Skill rating for the given game, falling back to the legacy
    /// top-level field.
    pub fn elo(&self, game: &str) -> Option<i64> {
        self.games
            .get(game)
            .and_then(|info| info.faceit_elo)
            .or(self.faceit_elo)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlayerGameInfo {
    #[serde(default)]
    pub faceit_elo: Option<i64>,
    #[serde(default)]
    pub skill_level: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HistoryEntry {
    #[serde(default)]
    pub match_id: Option<String>,
    #[serde(default)]
    pub competition_id: Option<String>,
    #[serde(default)]
    pub competition_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

// ---------- match statistics ----------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchStats {
    #[serde(default)]
    pub rounds: Vec<StatsRound>,
}

impl MatchStats {
    /// The map name recorded for the first round, if any.
    pub fn primary_map_name(&self) -> Option<String> {
        self.rounds.first().and_then(StatsRound::map_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatsRound {
    #[serde(default)]
    pub round_stats: HashMap<String, Value>,
    #[serde(default)]
    pub teams: Vec<TeamRoundStats>,
}

impl StatsRound {
    pub fn map_name(&self) -> Option<String> {
        match self.round_stats.get("Map") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamRoundStats {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub faction_id: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub team_stats: HashMap<String, Value>,
    #[serde(default)]
    pub players: Vec<PlayerRoundStats>,
}

impl TeamRoundStats {
    /// The identifier this block carries for the team, under whichever
    /// field the stats pipeline happened to fill.
    pub fn block_id(&self) -> Option<&str> {
        [
            self.team_id.as_deref(),
            self.faction_id.as_deref(),
            self.guid.as_deref(),
            self.name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
    }

    /// Match-level score, accepting both known spellings.
    pub fn final_score(&self) -> Option<i64> {
        stat_value(&self.team_stats, &["Final Score", "Score"]).and_then(|v| value_as_i64(&v))
    }

    pub fn player_ids(&self) -> Vec<&str> {
        self.players
            .iter()
            .filter_map(PlayerRoundStats::identifier)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlayerRoundStats {
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub player_stats: HashMap<String, Value>,
}

impl PlayerRoundStats {
    pub fn identifier(&self) -> Option<&str> {
        [
            self.player_id.as_deref(),
            self.user_id.as_deref(),
            self.id.as_deref(),
            self.guid.as_deref(),
            self.nickname.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
    }

    pub fn kills(&self) -> i64 {
        self.stat_i64(&["Kills"]).unwrap_or(0)
    }

    pub fn deaths(&self) -> i64 {
        self.stat_i64(&["Deaths"]).unwrap_or(0)
    }

    pub fn adr(&self) -> f64 {
        self.stat_f64(&["ADR"]).unwrap_or(0.0)
    }

    /// Headshot percentage under its known spellings, 0 when absent.
    pub fn headshot_pct(&self) -> f64 {
        self.stat_f64(&["Headshots %", "HS %", "HS%"]).unwrap_or(0.0)
    }

    fn stat_i64(&self, keys: &[&str]) -> Option<i64> {
        stat_value(&self.player_stats, keys).and_then(|v| value_as_i64(&v))
    }

    fn stat_f64(&self, keys: &[&str]) -> Option<f64> {
        stat_value(&self.player_stats, keys).and_then(|v| value_as_f64(&v))
    }
}

// ---------- team search / team stats / league team index ----------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamSearchItem {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub faceit_url: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamStats {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default)]
    pub lifetime: Option<Value>,
    #[serde(default)]
    pub segments: Vec<Value>,
}

/// One entry of the derived per-championship team index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeagueTeamSummary {
    pub team_id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
}

// ---------- value coercion helpers ----------

fn stat_value(map: &HashMap<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter().find_map(|key| map.get(*key).cloned())
}

/// Stats values arrive as JSON numbers or numeric strings depending on the
/// endpoint; anything unparseable counts as absent.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn value_as_i64(value: &Value) -> Option<i64> {
    value_as_f64(value).map(|f| f.round() as i64)
}
