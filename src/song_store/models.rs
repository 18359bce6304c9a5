use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Song
// =============================================================================

/// A song in the library.
///
/// Soft-deleted songs never leave the store layer, so there is no deletion
/// marker here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub group: String,
    pub title: String,
    pub release_date: String,
    pub text: String,
    pub link: String,
}

/// Everything needed to insert a song. Built from the caller's group/title
/// and the enrichment result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub group: String,
    pub title: String,
    pub release_date: String,
    pub text: String,
    pub link: String,
}

// =============================================================================
// Partial Updates
// =============================================================================

/// A single field of a partial update.
///
/// A field missing from the request body (or sent as `null`) deserializes to
/// `Keep`. Any other value, including an empty string, is `Set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Set(T),
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, target: &mut T) {
        if let FieldUpdate::Set(value) = self {
            *target = value;
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, FieldUpdate::Set(_))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Keep,
        })
    }
}

/// Patch body for `PUT /songs/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SongUpdate {
    #[serde(default)]
    pub group: FieldUpdate<String>,
    #[serde(default)]
    pub title: FieldUpdate<String>,
    #[serde(default)]
    pub release_date: FieldUpdate<String>,
    #[serde(default)]
    pub text: FieldUpdate<String>,
    #[serde(default)]
    pub link: FieldUpdate<String>,
}

impl SongUpdate {
    /// Merges every `Set` field onto `song`, leaving the rest untouched.
    pub fn apply_to(self, song: &mut Song) {
        self.group.apply_to(&mut song.group);
        self.title.apply_to(&mut song.title);
        self.release_date.apply_to(&mut song.release_date);
        self.text.apply_to(&mut song.text);
        self.link.apply_to(&mut song.link);
    }

    pub fn is_empty(&self) -> bool {
        !(self.group.is_set()
            || self.title.is_set()
            || self.release_date.is_set()
            || self.text.is_set()
            || self.link.is_set())
    }
}
