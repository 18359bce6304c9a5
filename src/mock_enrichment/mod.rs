//! Stand-in for the external enrichment service.
//!
//! Serves `POST /info` from a fixed dataset: either the built-in table or a
//! JSON file with an array of `{group, title, release_date, text, link}`
//! records. Used for local runs and end-to-end tests.

use crate::enrichment::SongDetails;
use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
struct DatasetRecord {
    group: String,
    title: String,
    release_date: String,
    text: String,
    link: String,
}

/// Songs known to the mock service, keyed by group then title.
#[derive(Debug, Clone, Default)]
pub struct MockDataset {
    songs: HashMap<String, HashMap<String, SongDetails>>,
}

impl MockDataset {
    pub fn builtin() -> Self {
        let mut dataset = Self::default();
        dataset.insert(
            "Muse",
            "Supermassive Black Hole",
            SongDetails {
                release_date: "2006-07-16".to_string(),
                text: "Ooh baby, don't you know I suffer?".to_string(),
                link: "https://youtube.com".to_string(),
            },
        );
        dataset.insert(
            "Muse",
            "Starlight",
            SongDetails {
                release_date: "2006-07-16".to_string(),
                text: "Far away, this ship is taking me far away...".to_string(),
                link: "https://youtube.com".to_string(),
            },
        );
        dataset.insert(
            "Radiohead",
            "Creep",
            SongDetails {
                release_date: "1992-09-21".to_string(),
                text: "I wish I was special, you're so very special.".to_string(),
                link: "https://youtube.com/watch?v=6nW3D-7ccU4".to_string(),
            },
        );
        dataset
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mock dataset: {:?}", path))?;
        let records: Vec<DatasetRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse mock dataset: {:?}", path))?;

        let mut dataset = Self::default();
        for record in records {
            dataset.insert(
                &record.group,
                &record.title,
                SongDetails {
                    release_date: record.release_date,
                    text: record.text,
                    link: record.link,
                },
            );
        }
        Ok(dataset)
    }

    pub fn insert(&mut self, group: &str, title: &str, details: SongDetails) {
        self.songs
            .entry(group.to_string())
            .or_default()
            .insert(title.to_string(), details);
    }

    pub fn get(&self, group: &str, title: &str) -> Option<&SongDetails> {
        self.songs.get(group).and_then(|titles| titles.get(title))
    }

    pub fn len(&self) -> usize {
        self.songs.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Deserialize)]
struct InfoRequest {
    #[serde(default)]
    group: String,
    #[serde(default)]
    title: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn post_info(
    State(dataset): State<Arc<MockDataset>>,
    body: Result<Json<InfoRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(err) => {
            debug!("Invalid mock enrichment request: {}", err);
            return error_response(StatusCode::BAD_REQUEST, "invalid parameters");
        }
    };

    if request.group.is_empty() || request.title.is_empty() {
        debug!("Mock enrichment request is missing group or title");
        return error_response(StatusCode::BAD_REQUEST, "missing parameters");
    }

    match dataset.get(&request.group, &request.title) {
        Some(details) => {
            info!(
                "Mock enrichment hit for {} / {}",
                request.group, request.title
            );
            Json(details.clone()).into_response()
        }
        None => {
            debug!(
                "Mock enrichment miss for {} / {}",
                request.group, request.title
            );
            error_response(StatusCode::NOT_FOUND, "song not found")
        }
    }
}

pub fn make_mock_enrichment_app(dataset: MockDataset) -> Router {
    Router::new()
        .route("/info", post(post_info))
        .with_state(Arc::new(dataset))
}

pub async fn run_mock_enrichment_server(listener: TcpListener, dataset: MockDataset) -> Result<()> {
    info!(
        "Mock enrichment service serving {} songs at {:?}",
        dataset.len(),
        listener.local_addr()?
    );
    axum::serve(listener, make_mock_enrichment_app(dataset)).await?;
    Ok(())
}
