// tests/common/faceit_stub.rs
//
// A stub FACEIT API bound to a random local port, serving canned payloads
// so the real client and pipeline can be driven end to end.
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::{web, App, HttpResponse, HttpServer};
use once_cell::sync::Lazy;
use secrecy::SecretString;
use serde_json::{json, Value};

use mapscout_backend::config::settings::FaceitSettings;
use mapscout_backend::services::FaceitClient;
use mapscout_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber("test".into(), "debug".into(), std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber("test".into(), "debug".into(), std::io::sink);
        init_subscriber(subscriber);
    }
});

#[derive(Default)]
pub struct StubState {
    pub page_size: usize,
    /// Full championship feed; the handler slices it into pages.
    pub feed: Vec<Value>,
    /// Respond with this HTTP status when the feed is requested at the
    /// given offset.
    pub feed_error_at_offset: Option<(usize, u16)>,
    pub teams: HashMap<String, Value>,
    pub players: HashMap<String, Value>,
    pub histories: HashMap<String, Value>,
    pub matches: HashMap<String, Value>,
    pub match_stats: HashMap<String, Value>,
    pub veto_histories: HashMap<String, Value>,
    /// Every feed request's offset, for pagination assertions.
    pub feed_offsets: Mutex<Vec<usize>>,
}

pub struct FaceitStub {
    pub address: String,
    pub state: Arc<StubState>,
}

impl FaceitStub {
    pub fn client(&self) -> FaceitClient {
        let page_size = if self.state.page_size > 0 {
            self.state.page_size
        } else {
            100
        };
        FaceitClient::new(&FaceitSettings {
            api_base_url: self.address.clone(),
            democracy_base_url: self.address.clone(),
            api_key: SecretString::new("test-key".to_string().into_boxed_str()),
            game: "cs2".to_string(),
            page_size,
            history_limit: 100,
        })
    }

    pub fn feed_requests(&self) -> Vec<usize> {
        self.state.feed_offsets.lock().unwrap().clone()
    }
}

pub async fn spawn_faceit_stub(state: StubState) -> FaceitStub {
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let state = Arc::new(state);
    let app_state = web::Data::from(Arc::clone(&state));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .route(
                "/championships/{id}/matches",
                web::get().to(championship_matches),
            )
            .route("/teams/{id}", web::get().to(team))
            .route("/players/{id}/history", web::get().to(player_history))
            .route("/players/{id}", web::get().to(player))
            .route("/matches/{id}/stats", web::get().to(match_stats))
            .route("/matches/{id}", web::get().to(match_by_id))
            .route("/match/{id}/history", web::get().to(veto_history))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to bind stub server")
    .run();

    let _ = tokio::spawn(server);

    FaceitStub { address, state }
}

async fn championship_matches(
    state: web::Data<StubState>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    let offset: usize = query
        .get("offset")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let limit: usize = query
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(100);

    state.feed_offsets.lock().unwrap().push(offset);

    if let Some((error_offset, status)) = state.feed_error_at_offset {
        if offset == error_offset {
            return HttpResponse::build(
                actix_web::http::StatusCode::from_u16(status).unwrap(),
            )
            .json(json!({ "errors": [{ "message": "stub error" }] }));
        }
    }

    let end = (offset + limit).min(state.feed.len());
    let items: Vec<Value> = if offset < state.feed.len() {
        state.feed[offset..end].to_vec()
    } else {
        Vec::new()
    };
    HttpResponse::Ok().json(json!({ "items": items }))
}

async fn team(state: web::Data<StubState>, path: web::Path<String>) -> HttpResponse {
    lookup(&state.teams, &path.into_inner())
}

async fn player(state: web::Data<StubState>, path: web::Path<String>) -> HttpResponse {
    lookup(&state.players, &path.into_inner())
}

async fn player_history(state: web::Data<StubState>, path: web::Path<String>) -> HttpResponse {
    match state.histories.get(&path.into_inner()) {
        Some(value) => HttpResponse::Ok().json(value),
        None => HttpResponse::Ok().json(json!({ "items": [] })),
    }
}

async fn match_by_id(state: web::Data<StubState>, path: web::Path<String>) -> HttpResponse {
    lookup(&state.matches, &path.into_inner())
}

async fn match_stats(state: web::Data<StubState>, path: web::Path<String>) -> HttpResponse {
    lookup(&state.match_stats, &path.into_inner())
}

async fn veto_history(state: web::Data<StubState>, path: web::Path<String>) -> HttpResponse {
    lookup(&state.veto_histories, &path.into_inner())
}

fn lookup(map: &HashMap<String, Value>, key: &str) -> HttpResponse {
    match map.get(key) {
        Some(value) => HttpResponse::Ok().json(value),
        None => HttpResponse::NotFound().json(json!({ "errors": [{ "message": "not found" }] })),
    }
}
