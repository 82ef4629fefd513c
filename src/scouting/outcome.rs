// src/scouting/outcome.rs
//
// Scores for a finished match come from whichever source actually has
// them: per-round statistics first, then the results summary on the match
// payload, then the last detailed result. Older or misconfigured matches
// are missing the earlier sources entirely.
use std::collections::{BTreeMap, HashSet};

use crate::models::faceit::{
    Faction, FactionSide, MatchStats, RawMatch, StatsRound, TeamRoundStats,
};
use crate::models::scouting::{MatchStatus, Outcome, PlayerMapSummary, PlayerMapTotals};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedScores {
    pub our_score: Option<i64>,
    pub opp_score: Option<i64>,
    pub outcome: Outcome,
}

pub fn resolve_outcome(
    m: &RawMatch,
    team_id: &str,
    stats: Option<&MatchStats>,
) -> ResolvedScores {
    let mut resolved = ResolvedScores::default();
    if m.match_status() != MatchStatus::Finished {
        return resolved;
    }
    let Some(side) = m.side_of(team_id) else {
        return resolved;
    };
    let Some((f1, f2)) = m.factions() else {
        return resolved;
    };
    let our_faction = match side {
        FactionSide::Faction1 => f1,
        FactionSide::Faction2 => f2,
    };

    // 1) per-round statistics
    if let Some(round) = stats.and_then(|s| s.rounds.first()) {
        let (ours, opp) = resolve_stats_blocks(round, our_faction, team_id);
        if let (Some(ours), Some(opp)) = (ours, opp) {
            if let (Some(our_score), Some(opp_score)) = (ours.final_score(), opp.final_score()) {
                resolved.our_score = Some(our_score);
                resolved.opp_score = Some(opp_score);
            }
        }
    }

    // 2) results summary on the match payload
    if resolved.our_score.is_none() || resolved.opp_score.is_none() {
        if let Some(score) = m.results.as_ref().and_then(|r| r.score.as_ref()) {
            if let Some((f1_score, f2_score)) = score.both() {
                let (our_score, opp_score) = orient(side, f1_score, f2_score);
                resolved.our_score = Some(our_score);
                resolved.opp_score = Some(opp_score);
            }
        }
    }

    // 3) last entry of the detailed results list
    if resolved.our_score.is_none() || resolved.opp_score.is_none() {
        if let Some(factions) = m
            .detailed_results
            .last()
            .and_then(|detail| detail.factions.as_ref())
        {
            if let Some((f1_score, f2_score)) = factions.both() {
                let (our_score, opp_score) = orient(side, f1_score, f2_score);
                resolved.our_score = Some(our_score);
                resolved.opp_score = Some(opp_score);
            }
        }
    }

    resolved.outcome = match (resolved.our_score, resolved.opp_score) {
        (Some(ours), Some(theirs)) => {
            if ours > theirs {
                Outcome::Win
            } else if ours < theirs {
                Outcome::Loss
            } else {
                Outcome::Tie
            }
        }
        _ => outcome_from_winner_flag(m, side),
    };

    resolved
}

fn orient(side: FactionSide, f1_score: i64, f2_score: i64) -> (i64, i64) {
    match side {
        FactionSide::Faction1 => (f1_score, f2_score),
        FactionSide::Faction2 => (f2_score, f1_score),
    }
}

/// When no source yielded two scores, an explicit winner flag still
/// decides win/loss.
fn outcome_from_winner_flag(m: &RawMatch, side: FactionSide) -> Outcome {
    let winner = m
        .results
        .as_ref()
        .and_then(|r| r.winner.as_deref())
        .unwrap_or("");
    match (winner, side) {
        ("faction1", FactionSide::Faction1) | ("faction2", FactionSide::Faction2) => Outcome::Win,
        ("faction1", FactionSide::Faction2) | ("faction2", FactionSide::Faction1) => Outcome::Loss,
        _ => Outcome::Unknown,
    }
}

/// Locate our team's stats block within a round: by team identifier first,
/// then by roster overlap. When neither or both blocks overlap the roster
/// there is no safe assignment and both come back `None`.
pub(crate) fn resolve_stats_blocks<'a>(
    round: &'a StatsRound,
    our_faction: &Faction,
    team_id: &str,
) -> (Option<&'a TeamRoundStats>, Option<&'a TeamRoundStats>) {
    let our_faction_id = our_faction.faction_id.as_deref();

    let ours_by_id = round.teams.iter().position(|block| {
        block
            .block_id()
            .is_some_and(|id| Some(id) == our_faction_id || id == team_id)
    });
    if let Some(index) = ours_by_id {
        let opp = round
            .teams
            .iter()
            .enumerate()
            .find(|(i, _)| *i != index)
            .map(|(_, block)| block);
        return (Some(&round.teams[index]), opp);
    }

    // fallback: whichever block shares players with our roster is ours
    let roster_ids: HashSet<&str> = our_faction.player_ids().into_iter().collect();
    if roster_ids.is_empty() {
        return (None, None);
    }
    let overlapping: Vec<usize> = round
        .teams
        .iter()
        .enumerate()
        .filter(|(_, block)| {
            block
                .player_ids()
                .iter()
                .any(|id| roster_ids.contains(id))
        })
        .map(|(i, _)| i)
        .collect();
    if overlapping.len() != 1 {
        // zero or ambiguous overlap: no resolution
        return (None, None);
    }
    let index = overlapping[0];
    let opp = round
        .teams
        .iter()
        .enumerate()
        .find(|(i, _)| *i != index)
        .map(|(_, block)| block);
    (Some(&round.teams[index]), opp)
}

/// Fold one finished match's round statistics into the per-player per-map
/// accumulators. Only players on our resolved block count, and only when
/// the round recorded a map name.
pub fn accumulate_player_stats(
    m: &RawMatch,
    team_id: &str,
    stats: &MatchStats,
    agg: &mut BTreeMap<String, PlayerMapSummary>,
) {
    if m.match_status() != MatchStatus::Finished {
        return;
    }
    let Some(side) = m.side_of(team_id) else {
        return;
    };
    let Some((f1, f2)) = m.factions() else {
        return;
    };
    let our_faction = match side {
        FactionSide::Faction1 => f1,
        FactionSide::Faction2 => f2,
    };
    let Some(round) = stats.rounds.first() else {
        return;
    };
    let Some(map_name) = round.map_name() else {
        return;
    };
    let (Some(ours), _) = resolve_stats_blocks(round, our_faction, team_id) else {
        return;
    };

    for player in &ours.players {
        let Some(player_id) = player.identifier() else {
            continue;
        };
        let nickname = player
            .nickname
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(player_id)
            .to_string();

        let kills = player.kills();
        let deaths = player.deaths();
        let adr = player.adr();
        let hs_fraction = player.headshot_pct() / 100.0;

        let summary = agg
            .entry(player_id.to_string())
            .or_insert_with(|| PlayerMapSummary {
                player_id: player_id.to_string(),
                nickname,
                maps: BTreeMap::new(),
            });
        let totals = summary
            .maps
            .entry(map_name.clone())
            .or_insert_with(PlayerMapTotals::default);

        totals.kills += kills;
        totals.deaths += deaths;
        totals.adr_sum += adr;
        totals.rounds += 1;
        if kills > 0 && hs_fraction > 0.0 {
            // the API only exposes a percentage, so this stays an estimate
            totals.hs_kills += kills as f64 * hs_fraction;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn finished_match(extra: serde_json::Value) -> RawMatch {
        let mut value = json!({
            "match_id": "m1",
            "status": "FINISHED",
            "finished_at": 1000,
            "teams": {
                "faction1": {
                    "faction_id": "us",
                    "name": "Us",
                    "roster": [
                        { "player_id": "p1", "nickname": "alpha" },
                        { "player_id": "p2", "nickname": "bravo" }
                    ]
                },
                "faction2": {
                    "faction_id": "them",
                    "name": "Them",
                    "roster": [{ "player_id": "e1", "nickname": "echo" }]
                }
            }
        });
        if let (Some(base), Some(patch)) = (value.as_object_mut(), extra.as_object()) {
            for (k, v) in patch {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(value).unwrap()
    }

    fn stats_with_blocks(blocks: serde_json::Value) -> MatchStats {
        serde_json::from_value(json!({
            "rounds": [{
                "round_stats": { "Map": "de_mirage" },
                "teams": blocks
            }]
        }))
        .unwrap()
    }

    #[test]
    fn round_stats_win_the_cascade() {
        let m = finished_match(json!({
            "results": { "score": { "faction1": 0, "faction2": 2 } }
        }));
        let stats = stats_with_blocks(json!([
            { "team_id": "us", "team_stats": { "Final Score": "13" } },
            { "team_id": "them", "team_stats": { "Final Score": "7" } }
        ]));
        let resolved = resolve_outcome(&m, "us", Some(&stats));
        assert_eq!(resolved.our_score, Some(13));
        assert_eq!(resolved.opp_score, Some(7));
        assert_eq!(resolved.outcome, Outcome::Win);
    }

    #[test]
    fn results_summary_is_used_when_stats_are_missing() {
        // our team is faction2, summary says faction1 won 2:1
        let m: RawMatch = serde_json::from_value(json!({
            "match_id": "m1",
            "status": "FINISHED",
            "teams": {
                "faction1": { "faction_id": "them", "name": "Them" },
                "faction2": { "faction_id": "us", "name": "Us" }
            },
            "results": { "score": { "faction1": 2, "faction2": 1 } }
        }))
        .unwrap();
        let resolved = resolve_outcome(&m, "us", None);
        assert_eq!(resolved.our_score, Some(1));
        assert_eq!(resolved.opp_score, Some(2));
        assert_eq!(resolved.outcome, Outcome::Loss);
    }

    #[test]
    fn detailed_results_are_the_last_resort_for_scores() {
        let m = finished_match(json!({
            "detailed_results": [
                { "factions": { "faction1": { "score": 16 }, "faction2": { "score": 9 } } },
                { "factions": { "faction1": { "score": 5 }, "faction2": { "score": 13 } } }
            ]
        }));
        let resolved = resolve_outcome(&m, "us", None);
        // last entry wins
        assert_eq!(resolved.our_score, Some(5));
        assert_eq!(resolved.opp_score, Some(13));
        assert_eq!(resolved.outcome, Outcome::Loss);
    }

    #[test]
    fn winner_flag_decides_when_no_scores_resolve() {
        let m = finished_match(json!({ "results": { "winner": "faction2" } }));
        let resolved = resolve_outcome(&m, "us", None);
        assert_eq!(resolved.our_score, None);
        assert_eq!(resolved.outcome, Outcome::Loss);

        let m = finished_match(json!({ "results": { "winner": "faction1" } }));
        assert_eq!(resolve_outcome(&m, "us", None).outcome, Outcome::Win);
    }

    #[test]
    fn unfinished_matches_resolve_to_unknown() {
        let mut m = finished_match(json!({
            "results": { "score": { "faction1": 2, "faction2": 0 } }
        }));
        m.status = Some("ONGOING".to_string());
        let resolved = resolve_outcome(&m, "us", None);
        assert_eq!(resolved.outcome, Outcome::Unknown);
        assert_eq!(resolved.our_score, None);
    }

    #[test]
    fn stats_blocks_resolve_by_roster_overlap_when_ids_are_absent() {
        let m = finished_match(json!({}));
        let stats = stats_with_blocks(json!([
            {
                "name": "team_alpha",
                "team_stats": { "Final Score": 13 },
                "players": [{ "player_id": "e1" }]
            },
            {
                "name": "team_bravo",
                "team_stats": { "Final Score": 11 },
                "players": [{ "player_id": "p1" }, { "player_id": "p2" }]
            }
        ]));
        // block names match nothing, so overlap decides: p1/p2 are ours
        let resolved = resolve_outcome(&m, "us", Some(&stats));
        assert_eq!(resolved.our_score, Some(11));
        assert_eq!(resolved.opp_score, Some(13));
        assert_eq!(resolved.outcome, Outcome::Loss);
    }

    #[test]
    fn ambiguous_overlap_resolves_nothing_and_falls_through() {
        let m = finished_match(json!({}));
        // both blocks claim one of our players: refuse to guess
        let stats = stats_with_blocks(json!([
            { "name": "a", "team_stats": { "Final Score": 13 }, "players": [{ "player_id": "p1" }] },
            { "name": "b", "team_stats": { "Final Score": 11 }, "players": [{ "player_id": "p2" }] }
        ]));
        let resolved = resolve_outcome(&m, "us", Some(&stats));
        assert_eq!(resolved.our_score, None);
        assert_eq!(resolved.outcome, Outcome::Unknown);
    }

    #[test]
    fn player_stats_accumulate_per_map_for_our_block_only() {
        let m = finished_match(json!({}));
        let stats = stats_with_blocks(json!([
            {
                "team_id": "us",
                "team_stats": { "Final Score": 13 },
                "players": [
                    {
                        "player_id": "p1",
                        "nickname": "alpha",
                        "player_stats": {
                            "Kills": "20", "Deaths": "10", "ADR": "85.5", "Headshots %": "50"
                        }
                    }
                ]
            },
            {
                "team_id": "them",
                "team_stats": { "Final Score": 7 },
                "players": [
                    { "player_id": "e1", "player_stats": { "Kills": "30", "Deaths": "5" } }
                ]
            }
        ]));

        let mut agg = BTreeMap::new();
        accumulate_player_stats(&m, "us", &stats, &mut agg);
        accumulate_player_stats(&m, "us", &stats, &mut agg);

        assert_eq!(agg.len(), 1);
        let alpha = &agg["p1"];
        let mirage = &alpha.maps["de_mirage"];
        assert_eq!(mirage.kills, 40);
        assert_eq!(mirage.deaths, 20);
        assert_eq!(mirage.rounds, 2);
        assert!((mirage.adr_sum - 171.0).abs() < 1e-9);
        assert!((mirage.hs_kills - 20.0).abs() < 1e-9);
    }

    #[test]
    fn player_stats_require_a_resolved_map_name() {
        let m = finished_match(json!({}));
        let stats: MatchStats = serde_json::from_value(json!({
            "rounds": [{
                "round_stats": {},
                "teams": [{
                    "team_id": "us",
                    "players": [{ "player_id": "p1", "player_stats": { "Kills": 9 } }]
                }]
            }]
        }))
        .unwrap();
        let mut agg = BTreeMap::new();
        accumulate_player_stats(&m, "us", &stats, &mut agg);
        assert!(agg.is_empty());
    }
}
