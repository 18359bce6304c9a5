use super::filter::SongFilter;
use super::models::{NewSong, Song};
use super::schema::SONG_VERSIONED_SCHEMAS;
use super::SongStore;
use crate::sqlite_persistence::{VersionedSchema, BASE_DB_VERSION};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const SONG_COLUMNS: &str =
    "id, group_name, title, release_date, text, link, created_at, updated_at";

pub struct SqliteSongStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSongStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Self::open_versioned(db_path.as_ref(), SONG_VERSIONED_SCHEMAS)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens the database at `path`, creating it at the latest of `schemas`
    /// or validating it and migrating it forward.
    fn open_versioned(path: &Path, schemas: &[VersionedSchema]) -> Result<Connection> {
        let latest = schemas.last().context("No songs database schema defined")?;
        let is_new_db = !path.exists();

        let mut conn = Connection::open(path).context("Failed to open songs database")?;

        if is_new_db {
            info!("Creating new songs database at {:?}", path);
            latest.create(&conn)?;
            return Ok(conn);
        }

        let raw_version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let db_version = raw_version - BASE_DB_VERSION as i64;

        if db_version < 1 {
            anyhow::bail!(
                "Songs database version {} is invalid (expected >= 1)",
                db_version
            );
        }

        let schema = schemas
            .iter()
            .find(|s| s.version == db_version as usize)
            .with_context(|| format!("Unknown songs database version {}", db_version))?;
        schema.validate(&conn).with_context(|| {
            format!(
                "Songs database schema validation failed for version {}",
                db_version
            )
        })?;

        if (db_version as usize) < latest.version {
            info!(
                "Migrating songs database from version {} to {}",
                db_version, latest.version
            );
            Self::migrate(&mut conn, schemas, db_version as usize)?;
            latest.validate(&conn).with_context(|| {
                format!(
                    "Songs database schema validation failed after migrating to version {}",
                    latest.version
                )
            })?;
        }

        Ok(conn)
    }

    fn migrate(
        conn: &mut Connection,
        schemas: &[VersionedSchema],
        from_version: usize,
    ) -> Result<()> {
        let tx = conn.transaction()?;
        let mut latest_from = from_version;
        for schema in schemas.iter().filter(|s| s.version > from_version) {
            info!(
                "Running songs database migration from version {} to {}",
                latest_from, schema.version
            );
            if let Some(migration_fn) = schema.migration {
                migration_fn(&tx).with_context(|| {
                    format!("Failed to run migration to version {}", schema.version)
                })?;
            }
            latest_from = schema.version;
        }
        tx.execute(
            &format!("PRAGMA user_version = {}", BASE_DB_VERSION + latest_from),
            [],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Songs database connection mutex poisoned"))
    }

    fn format_datetime(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339()
    }

    fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
    }

    fn row_to_song(row: &rusqlite::Row) -> rusqlite::Result<Song> {
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(Song {
            id: row.get("id")?,
            created_at: Self::parse_datetime(6, &created_at)?,
            updated_at: Self::parse_datetime(7, &updated_at)?,
            group: row.get("group_name")?,
            title: row.get("title")?,
            release_date: row.get("release_date")?,
            text: row.get("text")?,
            link: row.get("link")?,
        })
    }

    fn get_active_song(conn: &Connection, id: i64) -> Result<Option<Song>> {
        let song = conn
            .query_row(
                &format!(
                    "SELECT {} FROM songs WHERE id = ?1 AND deleted_at IS NULL",
                    SONG_COLUMNS
                ),
                params![id],
                Self::row_to_song,
            )
            .optional()?;
        Ok(song)
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl SongStore for SqliteSongStore {
    fn list_songs(&self, filter: &SongFilter) -> Result<Vec<Song>> {
        let limit = to_sql_int(filter.page_size);
        let offset = to_sql_int(filter.offset());

        let mut conditions = vec!["deleted_at IS NULL"];
        let mut values: Vec<&dyn ToSql> = Vec::new();

        if let Some(group) = &filter.group {
            conditions.push("group_name = ?");
            values.push(group);
        }
        // instr() instead of LIKE: LIKE is case-insensitive for ASCII and
        // treats % and _ in the needle as wildcards.
        if let Some(title) = &filter.title {
            conditions.push("instr(title, ?) > 0");
            values.push(title);
        }
        if let Some(release_date) = &filter.release_date {
            conditions.push("release_date = ?");
            values.push(release_date);
        }
        values.push(&limit);
        values.push(&offset);

        let sql = format!(
            "SELECT {} FROM songs WHERE {} ORDER BY id ASC LIMIT ? OFFSET ?",
            SONG_COLUMNS,
            conditions.join(" AND ")
        );
        debug!("Listing songs: {} ({:?})", sql, filter);

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let songs = stmt
            .query_map(&values[..], Self::row_to_song)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(songs)
    }

    fn get_song(&self, id: i64) -> Result<Option<Song>> {
        let conn = self.lock()?;
        Self::get_active_song(&conn, id)
    }

    fn insert_song(&self, song: &NewSong) -> Result<Song> {
        let conn = self.lock()?;
        let now = Utc::now();
        let now_str = Self::format_datetime(&now);

        conn.execute(
            "INSERT INTO songs (group_name, title, release_date, text, link, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                song.group,
                song.title,
                song.release_date,
                song.text,
                song.link,
                now_str
            ],
        )
        .context("Failed to insert song")?;

        Ok(Song {
            id: conn.last_insert_rowid(),
            created_at: now,
            updated_at: now,
            group: song.group.clone(),
            title: song.title.clone(),
            release_date: song.release_date.clone(),
            text: song.text.clone(),
            link: song.link.clone(),
        })
    }

    fn save_song(&self, song: &Song) -> Result<Option<Song>> {
        let conn = self.lock()?;
        let now = Self::format_datetime(&Utc::now());

        let changed = conn
            .execute(
                "UPDATE songs
                 SET group_name = ?1, title = ?2, release_date = ?3, text = ?4, link = ?5, updated_at = ?6
                 WHERE id = ?7 AND deleted_at IS NULL",
                params![
                    song.group,
                    song.title,
                    song.release_date,
                    song.text,
                    song.link,
                    now,
                    song.id
                ],
            )
            .with_context(|| format!("Failed to update song {}", song.id))?;

        if changed == 0 {
            return Ok(None);
        }
        Self::get_active_song(&conn, song.id)
    }

    fn soft_delete_song(&self, id: i64) -> Result<bool> {
        let conn = self.lock()?;
        let now = Self::format_datetime(&Utc::now());

        let changed = conn
            .execute(
                "UPDATE songs SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
                params![now, id],
            )
            .with_context(|| format!("Failed to delete song {}", id))?;

        Ok(changed > 0)
    }

    fn count_songs(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM songs WHERE deleted_at IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
