// src/services/competition_cache.rs
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::models::faceit::{LeagueTeamSummary, RawMatch};
use crate::services::faceit_client::{FaceitClient, FaceitError};

/// Process-wide cache keyed by championship id: the raw match feed and the
/// team index derived from it. Get-or-populate only: entries live for the
/// life of the process and are never refreshed, so a re-query of the same
/// championship returns whatever was first fetched.
#[derive(Debug, Default)]
pub struct CompetitionCache {
    matches: Mutex<HashMap<String, Arc<Vec<RawMatch>>>>,
    teams: Mutex<HashMap<String, Arc<Vec<LeagueTeamSummary>>>>,
}

impl CompetitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The championship's full match feed, fetching it on first use.
    /// The lock is held across the fetch so concurrent callers for the
    /// same championship do not fan out duplicate pagination runs.
    pub async fn championship_matches(
        &self,
        client: &FaceitClient,
        championship_id: &str,
    ) -> Result<Arc<Vec<RawMatch>>, FaceitError> {
        let mut cache = self.matches.lock().await;
        if let Some(hit) = cache.get(championship_id) {
            return Ok(Arc::clone(hit));
        }
        let fetched = Arc::new(client.championship_matches(championship_id).await?);
        cache.insert(championship_id.to_string(), Arc::clone(&fetched));
        Ok(fetched)
    }

    /// Teams seen in the championship feed, first occurrence per id,
    /// sorted by name.
    pub async fn team_index(
        &self,
        client: &FaceitClient,
        championship_id: &str,
    ) -> Result<Arc<Vec<LeagueTeamSummary>>, FaceitError> {
        {
            let cache = self.teams.lock().await;
            if let Some(hit) = cache.get(championship_id) {
                return Ok(Arc::clone(hit));
            }
        }

        let matches = self.championship_matches(client, championship_id).await?;
        let index = Arc::new(build_team_index(&matches));

        let mut cache = self.teams.lock().await;
        let entry = cache
            .entry(championship_id.to_string())
            .or_insert_with(|| Arc::clone(&index));
        Ok(Arc::clone(entry))
    }
}

fn build_team_index(matches: &[RawMatch]) -> Vec<LeagueTeamSummary> {
    let mut seen: HashMap<String, LeagueTeamSummary> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for m in matches {
        let Some((f1, f2)) = m.factions() else {
            continue;
        };
        for faction in [f1, f2] {
            let (Some(id), Some(name)) = (faction.faction_id.as_ref(), faction.name.as_ref())
            else {
                continue;
            };
            if seen.contains_key(id) {
                continue;
            }
            seen.insert(
                id.clone(),
                LeagueTeamSummary {
                    team_id: id.clone(),
                    name: name.clone(),
                    avatar: faction.avatar.clone(),
                    game: m.game.clone(),
                },
            );
            order.push(id.clone());
        }
    }

    let mut index: Vec<LeagueTeamSummary> = order
        .into_iter()
        .filter_map(|id| seen.remove(&id))
        .collect();
    index.sort_by(|a, b| a.name.cmp(&b.name));
    index
}
