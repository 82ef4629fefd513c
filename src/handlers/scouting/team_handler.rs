// src/handlers/scouting/team_handler.rs
use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use serde_json::json;

use crate::services::{CompetitionCache, FaceitClient};

#[derive(Debug, Deserialize)]
pub struct TeamSearchQuery {
    pub nickname: Option<String>,
}

/// Search teams by nickname on FACEIT (for the scouting search panel).
pub async fn search_teams(
    query: web::Query<TeamSearchQuery>,
    client: web::Data<FaceitClient>,
) -> Result<HttpResponse> {
    let nickname = query.nickname.as_deref().unwrap_or("");

    match client.search_teams(nickname).await {
        Ok(items) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": items
        }))),
        Err(e) => {
            tracing::error!("Team search for '{}' failed: {}", nickname, e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Team search failed"
            })))
        }
    }
}

/// Teams appearing in a championship's feed, for the league search index.
pub async fn get_championship_teams(
    championship_id: String,
    client: web::Data<FaceitClient>,
    cache: web::Data<CompetitionCache>,
) -> Result<HttpResponse> {
    match cache.team_index(client.get_ref(), &championship_id).await {
        Ok(index) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": index.as_ref()
        }))),
        Err(e) => {
            tracing::error!(
                "Team index for championship {} failed: {}",
                championship_id,
                e
            );
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to load championship teams"
            })))
        }
    }
}

/// Lifetime team statistics passthrough.
pub async fn get_team_stats(
    team_id: String,
    client: web::Data<FaceitClient>,
) -> Result<HttpResponse> {
    match client.team_stats(&team_id).await {
        Ok(Some(stats)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "No stats recorded for this team"
        }))),
        Err(e) => {
            tracing::error!("Team stats for {} failed: {}", team_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to load team stats"
            })))
        }
    }
}
