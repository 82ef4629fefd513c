use std::net::TcpListener;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{http, web, App, HttpServer};
use sqlx::PgPool;
use tracing_actix_web::TracingLogger;

pub mod config;
mod handlers;
pub mod models;
mod routes;
pub mod scouting;
pub mod services;
pub mod telemetry;

use crate::routes::init_routes;
use crate::services::{CompetitionCache, FaceitClient};

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    faceit_client: FaceitClient,
    competition_cache: Arc<CompetitionCache>,
) -> Result<Server, std::io::Error> {
    // Wrap using web::Data, which boils down to an Arc smart pointer
    let db_pool_data = web::Data::new(db_pool);
    let faceit_client_data = web::Data::new(faceit_client);
    let cache_data = web::Data::from(competition_cache);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_origin("https://mapscout.fly.dev")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(db_pool_data.clone())
            .app_data(faceit_client_data.clone())
            .app_data(cache_data.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
