//! HTTP client for the external enrichment service.

use super::{EnrichmentError, SongDetails, SongEnricher};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Serialize)]
struct SongInfoRequest<'a> {
    group: &'a str,
    title: &'a str,
}

/// HTTP client for the enrichment service's `POST /info` endpoint.
pub struct EnrichmentClient {
    client: reqwest::Client,
    base_url: String,
}

impl EnrichmentClient {
    /// Create a new enrichment client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the enrichment service (e.g., "http://localhost:8081")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: String, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SongEnricher for EnrichmentClient {
    async fn fetch_song_details(
        &self,
        group: &str,
        title: &str,
    ) -> Result<SongDetails, EnrichmentError> {
        let url = format!("{}/info", self.base_url);
        debug!(group, title, "Requesting song details from {}", url);

        let response = self
            .client
            .post(&url)
            .json(&SongInfoRequest { group, title })
            .send()
            .await
            .map_err(|e| EnrichmentError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(
                        status = status.as_u16(),
                        "Failed to read enrichment error body for {} / {}: {}", group, title, e
                    );
                    return Err(EnrichmentError::Unavailable(e.to_string()));
                }
            };
            warn!(
                status = status.as_u16(),
                "Enrichment service rejected {} / {}: {}", group, title, body
            );
            return Err(EnrichmentError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| EnrichmentError::Unavailable(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            EnrichmentError::Malformed(format!(
                "{} (body: {})",
                e,
                String::from_utf8_lossy(&bytes)
            ))
        })
    }
}
