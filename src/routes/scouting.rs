// src/routes/scouting.rs
use actix_web::{get, put, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::handlers::scouting::{report_handler, team_handler, veto_log_handler};
use crate::models::veto_log::UpsertVetoLogRequest;
use crate::services::{CompetitionCache, FaceitClient};

/// Full scouting report for a team within a championship
#[get("/teams/{team_id}/championships/{championship_id}/report")]
async fn team_report(
    path: web::Path<(String, String)>,
    client: web::Data<FaceitClient>,
    cache: web::Data<CompetitionCache>,
) -> Result<HttpResponse> {
    report_handler::get_team_report(path.into_inner(), client, cache).await
}

/// Season win/loss/tie record
#[get("/teams/{team_id}/championships/{championship_id}/record")]
async fn season_record(
    path: web::Path<(String, String)>,
    client: web::Data<FaceitClient>,
    cache: web::Data<CompetitionCache>,
) -> Result<HttpResponse> {
    report_handler::get_season_record(path.into_inner(), client, cache).await
}

/// Automatic veto tendencies
#[get("/teams/{team_id}/championships/{championship_id}/tendencies")]
async fn veto_tendencies(
    path: web::Path<(String, String)>,
    client: web::Data<FaceitClient>,
    cache: web::Data<CompetitionCache>,
) -> Result<HttpResponse> {
    report_handler::get_veto_tendencies(path.into_inner(), client, cache).await
}

/// Team search by nickname
#[get("/teams/search")]
async fn search_teams(
    query: web::Query<team_handler::TeamSearchQuery>,
    client: web::Data<FaceitClient>,
) -> Result<HttpResponse> {
    team_handler::search_teams(query, client).await
}

/// Teams seen in a championship
#[get("/championships/{championship_id}/teams")]
async fn championship_teams(
    path: web::Path<String>,
    client: web::Data<FaceitClient>,
    cache: web::Data<CompetitionCache>,
) -> Result<HttpResponse> {
    team_handler::get_championship_teams(path.into_inner(), client, cache).await
}

/// Lifetime team statistics
#[get("/teams/{team_id}/stats")]
async fn team_stats(
    path: web::Path<String>,
    client: web::Data<FaceitClient>,
) -> Result<HttpResponse> {
    team_handler::get_team_stats(path.into_inner(), client).await
}

/// Replace manual veto annotations for one match
#[put("/teams/{team_id}/matches/{match_id}/veto-log")]
async fn upsert_veto_log(
    path: web::Path<(String, String)>,
    request: web::Json<UpsertVetoLogRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    veto_log_handler::upsert_veto_log(path.into_inner(), request, pool).await
}

/// Manual veto annotations for a team
#[get("/teams/{team_id}/veto-logs")]
async fn veto_logs(path: web::Path<String>, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    veto_log_handler::get_veto_logs(path.into_inner(), pool).await
}

/// Manual veto tendency summary for a team
#[get("/teams/{team_id}/veto-summary")]
async fn veto_summary(path: web::Path<String>, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    veto_log_handler::get_veto_summary(path.into_inner(), pool).await
}
