//! Song Library Server
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod enrichment;
pub mod library;
pub mod mock_enrichment;
pub mod server;
pub mod song_store;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use enrichment::{EnrichmentClient, SongEnricher};
pub use library::{LibraryError, SongLibrary};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use song_store::{SongStore, SqliteSongStore};
