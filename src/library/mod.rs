//! Song library operations: catalog reads and the create/update/delete
//! pipeline.

mod error;

pub use error::LibraryError;

use crate::enrichment::SongEnricher;
use crate::song_store::{NewSong, Song, SongFilter, SongQueryParams, SongStore, SongUpdate};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type Result<T> = std::result::Result<T, LibraryError>;

/// Entry point for everything the HTTP layer does with songs.
///
/// Holds no state of its own besides the injected store and enricher, so it
/// is cheap to clone into every request.
#[derive(Clone)]
pub struct SongLibrary {
    store: Arc<dyn SongStore>,
    enricher: Arc<dyn SongEnricher>,
}

impl SongLibrary {
    pub fn new(store: Arc<dyn SongStore>, enricher: Arc<dyn SongEnricher>) -> Self {
        Self { store, enricher }
    }

    pub fn list_songs(&self, params: &SongQueryParams) -> Result<Vec<Song>> {
        let filter = SongFilter::resolve(params);
        Ok(self.store.list_songs(&filter)?)
    }

    pub fn get_song(&self, id: i64) -> Result<Song> {
        self.store.get_song(id)?.ok_or(LibraryError::NotFound(id))
    }

    /// Enriches and persists a new song.
    ///
    /// Nothing is written unless enrichment succeeds.
    pub async fn create_song(&self, group: &str, title: &str) -> Result<Song> {
        if group.trim().is_empty() {
            return Err(LibraryError::Validation(
                "group must not be empty".to_string(),
            ));
        }
        if title.trim().is_empty() {
            return Err(LibraryError::Validation(
                "title must not be empty".to_string(),
            ));
        }

        let details = match self.enricher.fetch_song_details(group, title).await {
            Ok(details) => details,
            Err(err) => {
                warn!("Enrichment failed for {} / {}: {}", group, title, err);
                return Err(err.into());
            }
        };

        let song = self.store.insert_song(&NewSong {
            group: group.to_string(),
            title: title.to_string(),
            release_date: details.release_date,
            text: details.text,
            link: details.link,
        })?;
        info!("Created song {} ({} / {})", song.id, song.group, song.title);
        Ok(song)
    }

    pub fn update_song(&self, id: i64, update: SongUpdate) -> Result<Song> {
        let mut song = self.get_song(id)?;
        if update.is_empty() {
            debug!("Update of song {} sets no fields", id);
        }
        update.apply_to(&mut song);

        // The song can disappear between the read and the write.
        let song = self
            .store
            .save_song(&song)?
            .ok_or(LibraryError::NotFound(id))?;
        info!("Updated song {}", id);
        Ok(song)
    }

    pub fn delete_song(&self, id: i64) -> Result<()> {
        if !self.store.soft_delete_song(id)? {
            return Err(LibraryError::NotFound(id));
        }
        info!("Deleted song {}", id);
        Ok(())
    }
}
