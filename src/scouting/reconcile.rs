// src/scouting/reconcile.rs
//
// The championship feed is authoritative but has been observed to drop
// finished matches from some pages. Player match histories are used as a
// completeness fallback: anything they surface that the feed did not is
// added, but on conflict the feed's version always wins.
use std::collections::{HashMap, HashSet};

use crate::models::faceit::RawMatch;
use crate::services::competition_cache::CompetitionCache;
use crate::services::faceit_client::{FaceitClient, FaceitError};

/// The authoritative match set for a (team, championship) pair, newest
/// first. Feed failures are fatal; everything on the history side is
/// best-effort.
pub async fn reconcile_team_matches(
    client: &FaceitClient,
    cache: &CompetitionCache,
    team_id: &str,
    championship_id: &str,
) -> Result<Vec<RawMatch>, FaceitError> {
    let feed = cache.championship_matches(client, championship_id).await?;
    let from_feed: Vec<RawMatch> = feed
        .iter()
        .filter(|m| m.factions().is_some() && m.involves_team(team_id))
        .cloned()
        .collect();

    let from_history = history_fallback(client, team_id, championship_id).await;

    Ok(merge_and_sort(from_feed, from_history))
}

/// Finished matches recovered from the recent history of every player
/// associated with the team (leader plus roster, deduplicated). Any
/// single candidate or match failing is logged and skipped; a failed team
/// lookup disables the fallback entirely.
async fn history_fallback(
    client: &FaceitClient,
    team_id: &str,
    championship_id: &str,
) -> Vec<RawMatch> {
    let team = match client.team(team_id).await {
        Ok(team) => team,
        Err(e) => {
            tracing::debug!(
                "Team lookup for {} failed, skipping history fallback: {}",
                team_id,
                e
            );
            return Vec::new();
        }
    };

    let mut candidates: Vec<String> = Vec::new();
    let mut seen_candidates: HashSet<String> = HashSet::new();
    if let Some(leader) = team.leader.as_deref().filter(|s| !s.is_empty()) {
        if seen_candidates.insert(leader.to_string()) {
            candidates.push(leader.to_string());
        }
    }
    for member in team.lineup() {
        if let Some(id) = member.identifier() {
            if seen_candidates.insert(id.to_string()) {
                candidates.push(id.to_string());
            }
        }
    }

    let mut seen_matches: HashSet<String> = HashSet::new();
    let mut recovered: Vec<RawMatch> = Vec::new();

    for player_id in &candidates {
        let entries = match client.player_history(player_id).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("History fetch for player {} failed: {}", player_id, e);
                continue;
            }
        };

        for entry in entries
            .iter()
            .filter(|e| e.competition_id.as_deref() == Some(championship_id))
        {
            let Some(match_id) = entry.match_id.as_deref() else {
                continue;
            };
            if seen_matches.contains(match_id) {
                continue;
            }
            match client.match_by_id(match_id).await {
                Ok(m) if m.involves_team(team_id) => {
                    seen_matches.insert(match_id.to_string());
                    recovered.push(m);
                }
                Ok(_) => {
                    // resolved to a match the team is not part of
                    seen_matches.insert(match_id.to_string());
                }
                Err(e) => {
                    tracing::warn!("Match {} from history did not resolve: {}", match_id, e);
                }
            }
        }
    }

    if !recovered.is_empty() {
        tracing::info!(
            "History fallback recovered {} matches for team {}",
            recovered.len(),
            team_id
        );
    }
    recovered
}

fn merge_and_sort(from_feed: Vec<RawMatch>, from_history: Vec<RawMatch>) -> Vec<RawMatch> {
    let mut by_id: HashMap<String, RawMatch> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    // feed entries first so they win any id conflict
    for m in from_feed.into_iter().chain(from_history) {
        let Some(id) = m.match_id.clone() else {
            continue;
        };
        if !by_id.contains_key(&id) {
            order.push(id.clone());
            by_id.insert(id, m);
        }
    }

    let mut merged: Vec<RawMatch> = order
        .into_iter()
        .filter_map(|id| by_id.remove(&id))
        .collect();
    merged.sort_by_key(|m| std::cmp::Reverse(m.sort_key()));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn match_with(id: &str, finished_at: i64, extra: serde_json::Value) -> RawMatch {
        let mut value = json!({
            "match_id": id,
            "status": "FINISHED",
            "finished_at": finished_at,
            "teams": {
                "faction1": { "faction_id": "us", "name": "Us" },
                "faction2": { "faction_id": "them", "name": "Them" }
            }
        });
        if let (Some(base), Some(patch)) = (value.as_object_mut(), extra.as_object()) {
            for (k, v) in patch {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn feed_version_wins_on_id_conflict() {
        let feed = vec![match_with(
            "m1",
            100,
            json!({ "results": { "score": { "faction1": 2, "faction2": 1 } } }),
        )];
        let history = vec![match_with(
            "m1",
            100,
            json!({ "results": { "score": { "faction1": 0, "faction2": 2 } } }),
        )];
        let merged = merge_and_sort(feed, history);
        assert_eq!(merged.len(), 1);
        let score = merged[0].results.as_ref().unwrap().score.as_ref().unwrap();
        assert_eq!(score.both(), Some((2, 1)));
    }

    #[test]
    fn history_only_matches_are_added() {
        let feed = vec![match_with("m1", 300, json!({}))];
        let history = vec![match_with("m2", 200, json!({})), match_with("m2", 200, json!({}))];
        let merged = merge_and_sort(feed, history);
        let ids: Vec<&str> = merged
            .iter()
            .filter_map(|m| m.match_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[test]
    fn merged_set_is_sorted_newest_first_by_best_timestamp() {
        let mut scheduled_only = match_with("m3", 0, json!({ "status": "SCHEDULED" }));
        scheduled_only.finished_at = None;
        scheduled_only.scheduled_at = Some(500);

        let mut dateless = match_with("m4", 0, json!({}));
        dateless.finished_at = None;

        let merged = merge_and_sort(
            vec![match_with("m1", 100, json!({})), scheduled_only],
            vec![match_with("m2", 400, json!({})), dateless],
        );
        let ids: Vec<&str> = merged
            .iter()
            .filter_map(|m| m.match_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["m3", "m2", "m1", "m4"]);
    }

    #[test]
    fn matches_without_an_id_are_dropped() {
        let mut no_id = match_with("m1", 100, json!({}));
        no_id.match_id = None;
        let merged = merge_and_sort(vec![no_id], vec![]);
        assert!(merged.is_empty());
    }
}
