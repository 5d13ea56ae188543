//! Row source over the library SQLite database
//!
//! Reads the `mediaitems`, `albums`, `artists` and `playlists` tables.
//! The database is opened read-only; nothing here creates or alters tables.

use super::{AlbumRow, ArtistRow, MediaItemRow, PlaylistRow, RowSource};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::Path;

const MEDIA_ITEMS_QUERY: &str = r#"
    SELECT id, title, artistId, albumId, composer, grouping, kind,
           fileSize, totalTime, trackNumber, year, beatsPerMinute,
           rating, ratingComputed, modifiedDate, addedDate,
           bitrate, sampleRate, comments, volumeNormalizationEnergy, location
    FROM mediaitems
    ORDER BY rowid
"#;

const PLAYLISTS_QUERY: &str = r#"
    SELECT id, parentId, name, master, items
    FROM playlists
    ORDER BY rowid
"#;

/// Library database opened read-only
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Open the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("Failed to open library database: {:?}", path))?;
        log::debug!("Opened library database {:?}", path);
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already open connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn row_to_media_item(row: &Row) -> rusqlite::Result<MediaItemRow> {
        Ok(MediaItemRow {
            id: row.get(0)?,
            title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            artist_id: row.get(2)?,
            album_id: row.get(3)?,
            composer: row.get(4)?,
            grouping: row.get(5)?,
            kind: row.get(6)?,
            file_size: row.get::<_, Option<i64>>(7)?.unwrap_or(0),
            total_time: row.get::<_, Option<i64>>(8)?.unwrap_or(0),
            track_number: row.get::<_, Option<i64>>(9)?.unwrap_or(0),
            year: row.get::<_, Option<i64>>(10)?.unwrap_or(0),
            beats_per_minute: row.get::<_, Option<i64>>(11)?.unwrap_or(0),
            rating: row.get::<_, Option<i64>>(12)?.unwrap_or(0),
            rating_computed: row.get::<_, Option<bool>>(13)?.unwrap_or(false),
            modified_date: parse_date(row.get::<_, Option<String>>(14)?.as_deref()),
            added_date: parse_date(row.get::<_, Option<String>>(15)?.as_deref()),
            bitrate: row.get::<_, Option<i64>>(16)?.unwrap_or(0),
            sample_rate: row.get::<_, Option<i64>>(17)?.unwrap_or(0),
            comments: row.get(18)?,
            volume_normalization_energy: row.get::<_, Option<i64>>(19)?.unwrap_or(0),
            location: row.get(20)?,
        })
    }

    fn row_to_playlist(row: &Row) -> rusqlite::Result<PlaylistRow> {
        Ok(PlaylistRow {
            id: row.get(0)?,
            parent_id: row.get(1)?,
            name: row.get(2)?,
            master: row.get(3)?,
            items: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        })
    }
}

impl RowSource for SqliteSource {
    fn scan_media_items(&self, visit: &mut dyn FnMut(MediaItemRow) -> Result<()>) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare(MEDIA_ITEMS_QUERY)
            .context("Failed to prepare media item query")?;
        let mut rows = stmt.query([])?;

        while let Some(row) = rows.next()? {
            visit(Self::row_to_media_item(row)?)?;
        }
        Ok(())
    }

    fn scan_playlists(&self, visit: &mut dyn FnMut(PlaylistRow) -> Result<()>) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare(PLAYLISTS_QUERY)
            .context("Failed to prepare playlist query")?;
        let mut rows = stmt.query([])?;

        while let Some(row) = rows.next()? {
            visit(Self::row_to_playlist(row)?)?;
        }
        Ok(())
    }

    fn artist(&self, id: i64) -> Result<Option<ArtistRow>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name FROM artists WHERE id = ?1")?;
        let result = stmt.query_row(params![id], |row| {
            Ok(ArtistRow {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        });

        match result {
            Ok(artist) => Ok(Some(artist)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => {
                Err(anyhow::Error::new(e).context(format!("Failed to look up artist {}", id)))
            }
        }
    }

    fn album(&self, id: i64) -> Result<Option<AlbumRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, discNumber, rating, ratingComputed FROM albums WHERE id = ?1",
        )?;
        let result = stmt.query_row(params![id], |row| {
            Ok(AlbumRow {
                id: row.get(0)?,
                disc_number: row.get::<_, Option<i64>>(1)?.unwrap_or(0),
                rating: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                rating_computed: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
            })
        });

        match result {
            Ok(album) => Ok(Some(album)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context(format!("Failed to look up album {}", id))),
        }
    }
}

/// Parse a stored date column
///
/// Dates are stored as UTC text, either `2024-01-31T12:00:00.000` or RFC 3339.
fn parse_date(text: Option<&str>) -> Option<DateTime<Utc>> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }

    log::warn!("Ignoring unparseable date {:?}", text);
    None
}
