//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per song-server endpoint.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    pub async fn home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    /// GET /songs with the given query parameters
    pub async fn list_songs(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/songs", self.base_url))
            .query(query)
            .send()
            .await
            .expect("List songs request failed")
    }

    pub async fn get_song(&self, id: i64) -> Response {
        self.client
            .get(format!("{}/songs/{}", self.base_url, id))
            .send()
            .await
            .expect("Get song request failed")
    }

    pub async fn create_song(&self, group: &str, title: &str) -> Response {
        self.create_song_raw(json!({ "group": group, "title": title }).to_string())
            .await
    }

    /// POST /songs with an arbitrary body, for malformed-input tests
    pub async fn create_song_raw(&self, body: String) -> Response {
        self.client
            .post(format!("{}/songs", self.base_url))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Create song request failed")
    }

    pub async fn update_song(&self, id: i64, patch: Value) -> Response {
        self.client
            .put(format!("{}/songs/{}", self.base_url, id))
            .json(&patch)
            .send()
            .await
            .expect("Update song request failed")
    }

    pub async fn delete_song(&self, id: i64) -> Response {
        self.client
            .delete(format!("{}/songs/{}", self.base_url, id))
            .send()
            .await
            .expect("Delete song request failed")
    }

    /// Creates a song and returns its JSON, panicking on any non-200 status
    pub async fn create_song_ok(&self, group: &str, title: &str) -> Value {
        let response = self.create_song(group, title).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Creating {} / {} failed",
            group,
            title
        );
        response.json().await.expect("Invalid song JSON")
    }
}
