// src/handlers/scouting/veto_log_handler.rs
use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use sqlx::PgPool;

use crate::models::veto_log::UpsertVetoLogRequest;
use crate::services::VetoLogService;

/// Replace the manual veto annotations for one (team, match) key.
pub async fn upsert_veto_log(
    path: (String, String),
    request: web::Json<UpsertVetoLogRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let (team_id, match_id) = path;
    let service = VetoLogService::new(pool.get_ref().clone());

    match service
        .upsert_match_veto(&team_id, &match_id, &request)
        .await
    {
        Ok(stored) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "stored_actions": stored }
        }))),
        Err(e) => {
            tracing::error!(
                "Failed to store veto log for team {} match {}: {}",
                team_id,
                match_id,
                e
            );
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to store veto log"
            })))
        }
    }
}

/// All manual annotations for a team, grouped per match.
pub async fn get_veto_logs(team_id: String, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = VetoLogService::new(pool.get_ref().clone());

    match service.vetoes_for_team(&team_id).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": entries
        }))),
        Err(e) => {
            tracing::error!("Failed to load veto logs for team {}: {}", team_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to load veto logs"
            })))
        }
    }
}

/// Aggregated manual-log tendencies for a team.
pub async fn get_veto_summary(team_id: String, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = VetoLogService::new(pool.get_ref().clone());

    match service.team_summary(&team_id).await {
        Ok(Some(summary)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "No veto logs recorded for this team"
        }))),
        Err(e) => {
            tracing::error!("Failed to summarize veto logs for team {}: {}", team_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "Failed to summarize veto logs"
            })))
        }
    }
}
