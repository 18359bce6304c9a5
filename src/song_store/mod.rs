mod filter;
mod models;
mod schema;
mod sqlite_song_store;

pub use filter::{SongFilter, SongQueryParams, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use models::*;
pub use schema::SONG_VERSIONED_SCHEMAS;
pub use sqlite_song_store::SqliteSongStore;

use anyhow::Result;

/// Persistence for songs.
///
/// Every read ignores soft-deleted rows. Implementations own their own
/// synchronization and are shared across request handlers.
pub trait SongStore: Send + Sync {
    /// Songs matching all predicates of `filter`, ordered by id, restricted
    /// to the filter's page window.
    fn list_songs(&self, filter: &SongFilter) -> Result<Vec<Song>>;

    fn get_song(&self, id: i64) -> Result<Option<Song>>;

    fn insert_song(&self, song: &NewSong) -> Result<Song>;

    /// Overwrites the mutable fields of an active song and bumps
    /// `updated_at`. Returns `None` if the song is gone or deleted.
    fn save_song(&self, song: &Song) -> Result<Option<Song>>;

    /// Marks a song as deleted. Returns `false` if there was no active song
    /// with that id.
    fn soft_delete_song(&self, id: i64) -> Result<bool>;

    /// Number of songs that are not deleted.
    fn count_songs(&self) -> Result<usize>;
}
