use axum::extract::FromRef;
use std::time::Instant;

use super::ServerConfig;
use crate::library::SongLibrary;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub library: SongLibrary,
}

impl ServerState {
    pub fn new(config: ServerConfig, library: SongLibrary) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            library,
        }
    }
}

impl FromRef<ServerState> for SongLibrary {
    fn from_ref(input: &ServerState) -> Self {
        input.library.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
