// src/scouting/report.rs
use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use crate::models::faceit::{DemocracyHistory, MatchStats, RawMatch, TeamMember};
use crate::models::scouting::{
    MatchReport, MatchStatus, Outcome, PlayerView, SeasonRecord, TeamScoutingReport,
};
use crate::scouting::aggregate::build_aggregates;
use crate::scouting::cancel::CancelToken;
use crate::scouting::reconcile::reconcile_team_matches;
use crate::services::competition_cache::CompetitionCache;
use crate::services::faceit_client::{FaceitClient, FaceitError};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to load championship matches: {0}")]
    Fetch(#[from] FaceitError),
    #[error("query was cancelled")]
    Cancelled,
}

/// Builds the scouting view for one (team, championship) query. Everything
/// is recomputed from scratch per query; the only shared state is the
/// championship feed cache.
pub struct ScoutingService {
    client: FaceitClient,
    cache: Arc<CompetitionCache>,
}

impl ScoutingService {
    pub fn new(client: FaceitClient, cache: Arc<CompetitionCache>) -> Self {
        Self { client, cache }
    }

    pub async fn team_report(
        &self,
        team_id: &str,
        championship_id: &str,
        cancel: &CancelToken,
    ) -> Result<TeamScoutingReport, ReportError> {
        let players = self.enrich_players(team_id).await;
        cancel.ensure_active()?;

        let matches =
            reconcile_team_matches(&self.client, &self.cache, team_id, championship_id).await?;
        cancel.ensure_active()?;

        if matches.is_empty() {
            return Ok(TeamScoutingReport::empty_with_players(players));
        }

        let stats_by_id = self.fetch_stats(&matches).await;
        cancel.ensure_active()?;

        let veto_by_id = self.fetch_veto_histories(&matches).await;
        cancel.ensure_active()?;

        let aggregates = build_aggregates(team_id, &matches, &stats_by_id, &veto_by_id);

        Ok(TeamScoutingReport {
            rows: aggregates.rows,
            map_stats: aggregates.map_stats,
            locations: aggregates.locations,
            competition_name: aggregates.competition_name,
            players,
            player_map_stats: aggregates.player_map_stats,
            generated_at: chrono::Utc::now(),
        })
    }

    /// Roster with per-player profile enrichment, all profiles fetched
    /// concurrently. A failed profile falls back to the roster entry; a
    /// failed team lookup yields an empty list. Player data is never a
    /// reason to fail the query.
    async fn enrich_players(&self, team_id: &str) -> Vec<PlayerView> {
        let team = match self.client.team(team_id).await {
            Ok(team) => team,
            Err(e) => {
                tracing::warn!("Team lookup for {} failed: {}", team_id, e);
                return Vec::new();
            }
        };

        let futures = team.lineup().iter().map(|member| self.enrich_member(member));
        join_all(futures).await.into_iter().flatten().collect()
    }

    async fn enrich_member(&self, member: &TeamMember) -> Option<PlayerView> {
        let member_id = member.identifier();
        let nickname = member.display_name();
        let lookup_key = member_id.or(nickname)?;

        match self.client.player(lookup_key).await {
            Ok(profile) => {
                let player_id = profile
                    .player_id
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .or(member_id)
                    .unwrap_or(lookup_key)
                    .to_string();
                let nickname = profile
                    .nickname
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .or(nickname)
                    .unwrap_or("Unknown")
                    .to_string();
                let faceit_elo = profile.elo(self.client.game());
                Some(PlayerView {
                    player_id,
                    nickname,
                    faceit_elo,
                })
            }
            Err(e) => {
                tracing::warn!("Player lookup for {} failed: {}", lookup_key, e);
                Some(PlayerView {
                    player_id: member_id.unwrap_or(lookup_key).to_string(),
                    nickname: nickname.or(member_id).unwrap_or("Unknown").to_string(),
                    faceit_elo: None,
                })
            }
        }
    }

    /// Statistics for every finished match, fetched concurrently. A failed
    /// or absent fetch leaves that match without stats.
    async fn fetch_stats(&self, matches: &[RawMatch]) -> HashMap<String, MatchStats> {
        let finished: Vec<&str> = matches
            .iter()
            .filter(|m| m.match_status() == MatchStatus::Finished)
            .filter_map(|m| m.match_id.as_deref())
            .collect();

        let futures = finished.iter().map(|match_id| async move {
            match self.client.match_stats(match_id).await {
                Ok(Some(stats)) => Some((match_id.to_string(), stats)),
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!("Stats fetch for match {} failed: {}", match_id, e);
                    None
                }
            }
        });

        join_all(futures).await.into_iter().flatten().collect()
    }

    /// Veto histories for every match, fetched concurrently; the client
    /// already folds all failure modes into "no data".
    async fn fetch_veto_histories(
        &self,
        matches: &[RawMatch],
    ) -> HashMap<String, DemocracyHistory> {
        let ids: Vec<&str> = matches.iter().filter_map(|m| m.match_id.as_deref()).collect();

        let futures = ids.iter().map(|match_id| async move {
            self.client
                .match_veto_history(match_id)
                .await
                .map(|history| (match_id.to_string(), history))
        });

        join_all(futures).await.into_iter().flatten().collect()
    }
}

/// W/L/T record over the finished subset of a report's rows.
pub fn season_record(rows: &[MatchReport]) -> SeasonRecord {
    let mut wins = 0;
    let mut losses = 0;
    let mut ties = 0;
    for row in rows.iter().filter(|r| r.status == MatchStatus::Finished) {
        match row.outcome {
            Outcome::Win => wins += 1,
            Outcome::Loss => losses += 1,
            Outcome::Tie => ties += 1,
            Outcome::Unknown => {}
        }
    }
    SeasonRecord {
        wins,
        losses,
        ties,
        total: wins + losses + ties,
    }
}

/// Scheduled and ongoing rows, oldest first, for the upcoming section.
pub fn upcoming_rows(rows: &[MatchReport]) -> Vec<MatchReport> {
    let mut upcoming: Vec<MatchReport> = rows
        .iter()
        .filter(|r| matches!(r.status, MatchStatus::Scheduled | MatchStatus::Ongoing))
        .cloned()
        .collect();
    upcoming.sort_by_key(|r| r.sort_key);
    upcoming
}
