// src/services/veto_log_service.rs
use std::collections::{HashMap, HashSet};

use sqlx::PgPool;

use crate::models::veto_log::{
    normalize_map_name, ManualMapSummary, ManualMatchVeto, ManualVetoAction, TeamVetoSummary,
    UpsertVetoLogRequest, VetoActionType, VetoLogRow,
};

/// Manual veto annotations, stored per (team, match) key. Writes replace the
/// key wholesale: delete the old rows, then insert the current set. The two
/// statements are deliberately not wrapped in a transaction: a failure in
/// between leaves the key empty, an accepted risk at human-paced usage.
#[derive(Debug)]
pub struct VetoLogService {
    pool: PgPool,
}

impl VetoLogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn upsert_match_veto(
        &self,
        team_id: &str,
        match_id: &str,
        request: &UpsertVetoLogRequest,
    ) -> Result<usize, sqlx::Error> {
        let rows: Vec<(String, VetoActionType)> = request
            .actions
            .iter()
            .filter_map(|action| {
                normalize_map_name(&action.map).map(|map| (map, action.action))
            })
            .collect();

        sqlx::query("DELETE FROM team_veto_logs WHERE team_id = $1 AND match_id = $2")
            .bind(team_id)
            .bind(match_id)
            .execute(&self.pool)
            .await?;

        if rows.is_empty() {
            tracing::info!(
                "Cleared veto log for team {} match {} (no usable actions)",
                team_id,
                match_id
            );
            return Ok(0);
        }

        for (map, action) in &rows {
            sqlx::query(
                r#"
                INSERT INTO team_veto_logs (team_id, team_name, match_id, map, action_type)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(team_id)
            .bind(&request.team_name)
            .bind(match_id)
            .bind(map)
            .bind(action.as_str())
            .execute(&self.pool)
            .await?;
        }

        tracing::info!(
            "Stored {} veto actions for team {} match {}",
            rows.len(),
            team_id,
            match_id
        );
        Ok(rows.len())
    }

    /// All annotations for a team, grouped per match in insertion order.
    pub async fn vetoes_for_team(&self, team_id: &str) -> Result<Vec<ManualMatchVeto>, sqlx::Error> {
        let rows: Vec<VetoLogRow> = sqlx::query_as(
            r#"
            SELECT team_id, team_name, match_id, map, action_type
            FROM team_veto_logs
            WHERE team_id = $1
            ORDER BY id
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_rows(rows))
    }

    /// Aggregated tendencies from the stored logs; `None` when the team has
    /// no annotations yet.
    pub async fn team_summary(&self, team_id: &str) -> Result<Option<TeamVetoSummary>, sqlx::Error> {
        let entries = self.vetoes_for_team(team_id).await?;
        Ok(summarize(&entries))
    }
}

fn group_rows(rows: Vec<VetoLogRow>) -> Vec<ManualMatchVeto> {
    let mut by_match: HashMap<String, ManualMatchVeto> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for row in rows {
        let entry = by_match.entry(row.match_id.clone()).or_insert_with(|| {
            order.push(row.match_id.clone());
            ManualMatchVeto {
                match_id: row.match_id.clone(),
                team_id: row.team_id.clone(),
                team_name: row.team_name.clone(),
                actions: Vec::new(),
            }
        });
        if let Some(action) = VetoActionType::from_str_loose(&row.action_type) {
            entry.actions.push(ManualVetoAction {
                map: row.map,
                action,
            });
        }
    }

    order
        .into_iter()
        .filter_map(|match_id| by_match.remove(&match_id))
        .collect()
}

pub(crate) fn summarize(entries: &[ManualMatchVeto]) -> Option<TeamVetoSummary> {
    if entries.is_empty() {
        return None;
    }

    struct Counts {
        picks: u32,
        bans: u32,
        matches: HashSet<String>,
    }
    let mut counts: HashMap<String, Counts> = HashMap::new();

    for entry in entries {
        for action in &entry.actions {
            let Some(map) = normalize_map_name(&action.map) else {
                continue;
            };
            let c = counts.entry(map).or_insert_with(|| Counts {
                picks: 0,
                bans: 0,
                matches: HashSet::new(),
            });
            match action.action {
                VetoActionType::Pick => c.picks += 1,
                VetoActionType::Ban => c.bans += 1,
            }
            c.matches.insert(entry.match_id.clone());
        }
    }

    let mut maps: Vec<ManualMapSummary> = counts
        .into_iter()
        .map(|(map, c)| {
            let total_matches = c.matches.len().max(1) as u32;
            ManualMapSummary {
                map,
                picks: c.picks,
                bans: c.bans,
                total_matches,
                pick_rate: c.picks as f64 / total_matches as f64,
                ban_rate: c.bans as f64 / total_matches as f64,
            }
        })
        .collect();

    let likely_permabans: Vec<String> = maps
        .iter()
        .filter(|m| m.bans >= 2 && m.ban_rate >= 0.7)
        .map(|m| m.map.clone())
        .collect();
    let likely_comfort_picks: Vec<String> = maps
        .iter()
        .filter(|m| m.picks >= 2 && m.pick_rate >= 0.5)
        .map(|m| m.map.clone())
        .collect();

    maps.sort_by(|a, b| (b.picks + b.bans).cmp(&(a.picks + a.bans)));

    Some(TeamVetoSummary {
        matches_tracked: entries.len() as u32,
        maps,
        likely_permabans,
        likely_comfort_picks,
    })
}
