//! HTTP route definitions

use axum::{
    extract::State,
    http::{header, Method},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::app::AppState;
use crate::util::time::uptime_secs;
use crate::ws::handler::{field_handler, pong_handler};

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // CORS configuration - multiple origins supported (comma-separated in
    // CLIENT_ORIGIN); unset means any origin.
    let cors = match &state.config.client_origin {
        Some(origins) => {
            let allowed: Vec<header::HeaderValue> = origins
                .split(',')
                .filter_map(|s| s.trim().parse::<header::HeaderValue>().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([Method::GET])
                .allow_headers([header::CONTENT_TYPE])
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET])
            .allow_headers([header::CONTENT_TYPE]),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/ws/pong/:client_id", get(pong_handler))
        .route("/ws/field", get(field_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    active_pads: usize,
    connections: usize,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (active_pads, connections) = {
        let game = state.game.lock();
        (game.registry.active_players(), game.arena.connections)
    };

    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        active_pads,
        connections,
    })
}
