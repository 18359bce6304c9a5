use crate::enrichment::EnrichmentError;
use thiserror::Error;

/// Errors surfaced by [`super::SongLibrary`].
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Song {0} not found")]
    NotFound(i64),

    #[error("Enrichment failed: {0}")]
    Enrichment(#[from] EnrichmentError),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}
