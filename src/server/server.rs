use anyhow::Result;
use std::time::Duration;

use axum::{extract::State, middleware, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::info;

use super::song_routes::song_routes;
use super::{log_requests, state::ServerState, ServerConfig};
use crate::library::SongLibrary;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn make_app(config: ServerConfig, library: SongLibrary) -> Router {
    let state = ServerState::new(config, library);

    Router::new()
        .route("/", get(home))
        .merge(song_routes())
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub async fn run_server(config: ServerConfig, library: SongLibrary) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Ready to serve at {:?}", listener.local_addr()?);

    let app = make_app(config, library);
    Ok(axum::serve(listener, app).await?)
}
