// src/handlers/scouting/report_handler.rs
use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::scouting::{
    season_record, tendencies, upcoming_rows, CancelToken, ReportError, ScoutingService,
};
use crate::services::{CompetitionCache, FaceitClient};

fn service(
    client: &web::Data<FaceitClient>,
    cache: &web::Data<CompetitionCache>,
) -> ScoutingService {
    ScoutingService::new(client.get_ref().clone(), cache.clone().into_inner())
}

fn report_failure(team_id: &str, championship_id: &str, e: ReportError) -> HttpResponse {
    tracing::error!(
        "Report for team {} in championship {} failed: {}",
        team_id,
        championship_id,
        e
    );
    HttpResponse::InternalServerError().json(json!({
        "success": false,
        "message": "Failed to load championship matches"
    }))
}

/// Full scouting report for a team within a championship.
pub async fn get_team_report(
    path: (String, String),
    client: web::Data<FaceitClient>,
    cache: web::Data<CompetitionCache>,
) -> Result<HttpResponse> {
    let (team_id, championship_id) = path;
    let scouting = service(&client, &cache);

    match scouting
        .team_report(&team_id, &championship_id, &CancelToken::new())
        .await
    {
        Ok(report) => {
            let upcoming = upcoming_rows(&report.rows);
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": {
                    "report": report,
                    "upcoming": upcoming
                }
            })))
        }
        Err(e) => Ok(report_failure(&team_id, &championship_id, e)),
    }
}

/// Season W/L/T record over the finished matches.
pub async fn get_season_record(
    path: (String, String),
    client: web::Data<FaceitClient>,
    cache: web::Data<CompetitionCache>,
) -> Result<HttpResponse> {
    let (team_id, championship_id) = path;
    let scouting = service(&client, &cache);

    match scouting
        .team_report(&team_id, &championship_id, &CancelToken::new())
        .await
    {
        Ok(report) => {
            let record = season_record(&report.rows);
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": record
            })))
        }
        Err(e) => Ok(report_failure(&team_id, &championship_id, e)),
    }
}

/// Automatic veto tendencies derived from the resolved pick/ban events.
pub async fn get_veto_tendencies(
    path: (String, String),
    client: web::Data<FaceitClient>,
    cache: web::Data<CompetitionCache>,
) -> Result<HttpResponse> {
    let (team_id, championship_id) = path;
    let scouting = service(&client, &cache);

    match scouting
        .team_report(&team_id, &championship_id, &CancelToken::new())
        .await
    {
        Ok(report) => {
            let analysis = tendencies::analyze(&report.rows);
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": analysis
            })))
        }
        Err(e) => Ok(report_failure(&team_id, &championship_id, e)),
    }
}
