// src/scouting/aggregate.rs
use std::collections::{BTreeMap, HashMap};

use crate::models::faceit::{DemocracyHistory, FactionSide, MatchStats, RawMatch};
use crate::models::scouting::{
    MapPlayCount, MatchReport, MatchStatus, PlayerMapSummary,
};
use crate::scouting::outcome::{accumulate_player_stats, resolve_outcome};
use crate::scouting::veto::resolve_veto;

/// Everything derived from the reconciled match set in one pass.
#[derive(Debug, Default)]
pub struct ReportAggregates {
    pub rows: Vec<MatchReport>,
    pub map_stats: BTreeMap<String, MapPlayCount>,
    pub locations: BTreeMap<String, u32>,
    pub competition_name: Option<String>,
    pub player_map_stats: Vec<PlayerMapSummary>,
}

pub fn build_aggregates(
    team_id: &str,
    matches: &[RawMatch],
    stats_by_id: &HashMap<String, MatchStats>,
    veto_by_id: &HashMap<String, DemocracyHistory>,
) -> ReportAggregates {
    let mut aggregates = ReportAggregates::default();
    let mut player_agg: BTreeMap<String, PlayerMapSummary> = BTreeMap::new();

    for m in matches {
        let Some((f1, f2)) = m.factions() else {
            continue;
        };
        let Some(side) = m.side_of(team_id) else {
            continue;
        };
        let opponent = match side {
            FactionSide::Faction1 => f2,
            FactionSide::Faction2 => f1,
        };
        let Some(match_id) = m.match_id.clone() else {
            continue;
        };

        let status = m.match_status();
        if aggregates.competition_name.is_none() {
            aggregates.competition_name = m
                .competition_name
                .clone()
                .filter(|name| !name.is_empty());
        }

        let stats = stats_by_id.get(&match_id);
        let history = veto_by_id.get(&match_id);

        let scores = resolve_outcome(m, team_id, stats);
        if let Some(stats) = stats {
            accumulate_player_stats(m, team_id, stats, &mut player_agg);
        }

        let veto = resolve_veto(m, history, stats);

        if status == MatchStatus::Finished {
            if let Some(primary_map) = veto.picked.first() {
                aggregates
                    .map_stats
                    .entry(primary_map.clone())
                    .or_default()
                    .played += 1;
            }
            if let Some(primary_location) = veto.locations.first() {
                *aggregates
                    .locations
                    .entry(primary_location.clone())
                    .or_default() += 1;
            }
        }

        aggregates.rows.push(MatchReport {
            match_id,
            opponent: opponent
                .name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            status,
            picked: veto.picked,
            banned: veto.banned,
            locations: veto.locations,
            our_score: scores.our_score,
            opp_score: scores.opp_score,
            outcome: scores.outcome,
            url: m.view_url(),
            sort_key: m.sort_key(),
        });
    }

    aggregates.player_map_stats = player_agg.into_values().collect();
    aggregates
}
