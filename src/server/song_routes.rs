//! Song catalog HTTP routes.
//!
//! - GET /songs
//! - POST /songs
//! - GET /songs/{id}
//! - PUT /songs/{id}
//! - DELETE /songs/{id}

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, error};

use crate::library::{LibraryError, SongLibrary};
use crate::server::state::ServerState;
use crate::song_store::{SongQueryParams, SongUpdate};

#[derive(Debug, Deserialize)]
pub struct CreateSongBody {
    pub group: String,
    pub title: String,
}

impl IntoResponse for LibraryError {
    fn into_response(self) -> Response {
        match self {
            LibraryError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            LibraryError::NotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            LibraryError::Enrichment(err) => {
                error!("Song enrichment failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch song details",
                )
                    .into_response()
            }
            LibraryError::Store(err) => {
                error!("Song store error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err)).into_response()
            }
        }
    }
}

fn bad_body(rejection: JsonRejection) -> Response {
    debug!("Rejected request body: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        format!("Invalid request body: {}", rejection.body_text()),
    )
        .into_response()
}

/// GET /songs - Filtered, paginated catalog
async fn list_songs(
    State(library): State<SongLibrary>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = SongQueryParams::from_pairs(pairs);
    match library.list_songs(&params) {
        Ok(songs) => Json(songs).into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /songs/{id}
async fn get_song(State(library): State<SongLibrary>, Path(id): Path<i64>) -> Response {
    match library.get_song(id) {
        Ok(song) => Json(song).into_response(),
        Err(err) => err.into_response(),
    }
}

/// POST /songs - Enrich and store a new song
async fn create_song(
    State(library): State<SongLibrary>,
    body: Result<Json<CreateSongBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };

    match library.create_song(&body.group, &body.title).await {
        Ok(song) => Json(song).into_response(),
        Err(err) => err.into_response(),
    }
}

/// PUT /songs/{id} - Partial update, absent fields are kept
async fn update_song(
    State(library): State<SongLibrary>,
    Path(id): Path<i64>,
    body: Result<Json<SongUpdate>, JsonRejection>,
) -> Response {
    let Json(update) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };

    match library.update_song(id, update) {
        Ok(song) => Json(song).into_response(),
        Err(err) => err.into_response(),
    }
}

/// DELETE /songs/{id} - Soft delete
async fn delete_song(State(library): State<SongLibrary>, Path(id): Path<i64>) -> Response {
    match library.delete_song(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn song_routes() -> Router<ServerState> {
    Router::new()
        .route("/songs", get(list_songs).post(create_song))
        .route(
            "/songs/{id}",
            get(get_song).put(update_song).delete(delete_song),
        )
}
