use actix_web::web;

pub mod backend_health;
pub mod scouting;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    cfg.service(
        web::scope("/scouting")
            .service(scouting::team_report)
            .service(scouting::season_record)
            .service(scouting::veto_tendencies)
            .service(scouting::search_teams)
            .service(scouting::championship_teams)
            .service(scouting::team_stats)
            .service(scouting::upsert_veto_log)
            .service(scouting::veto_logs)
            .service(scouting::veto_summary),
    );
}
