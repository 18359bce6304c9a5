//! Song metadata enrichment.
//!
//! New songs are enriched with their release date, lyrics and link by an
//! external metadata service. [`SongEnricher`] is the seam the library
//! depends on; [`EnrichmentClient`] is the HTTP implementation.

mod client;

pub use client::EnrichmentClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata returned by the enrichment service for one song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDetails {
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    pub text: String,
    pub link: String,
}

/// Errors that can occur when fetching song details.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// The service could not be reached or the response could not be read.
    #[error("Enrichment service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with a status other than 200.
    #[error("Enrichment service returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The service answered 200 with a body that is not song details.
    #[error("Malformed enrichment response: {0}")]
    Malformed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SongEnricher: Send + Sync {
    /// Fetches details for a (group, title) pair. Performs a single attempt.
    async fn fetch_song_details(
        &self,
        group: &str,
        title: &str,
    ) -> Result<SongDetails, EnrichmentError>;
}
