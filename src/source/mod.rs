//! Relational row sources
//!
//! The builder reads four logical tables: media items and playlists are
//! scanned once, front to back; artists and albums are looked up by id.

mod memory;
mod sqlite;

pub use memory::MemorySource;
pub use sqlite::SqliteSource;

use anyhow::Result;
use chrono::{DateTime, Utc};

/// Row of the artists table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistRow {
    pub id: i64,
    pub name: Option<String>,
}

/// Row of the albums table (only the columns tracks inherit)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumRow {
    pub id: i64,
    pub disc_number: i64,
    pub rating: i64,
    pub rating_computed: bool,
}

/// Row of the mediaitems table
#[derive(Debug, Clone, Default)]
pub struct MediaItemRow {
    /// Persistent ID
    pub id: i64,
    pub title: String,
    pub artist_id: Option<i64>,
    pub album_id: i64,
    pub composer: Option<String>,
    pub grouping: Option<String>,
    pub kind: Option<String>,
    pub file_size: i64,
    pub total_time: i64,
    pub track_number: i64,
    pub year: i64,
    pub beats_per_minute: i64,
    pub rating: i64,
    pub rating_computed: bool,
    pub modified_date: Option<DateTime<Utc>>,
    pub added_date: Option<DateTime<Utc>>,
    pub bitrate: i64,
    pub sample_rate: i64,
    pub comments: Option<String>,
    pub volume_normalization_energy: i64,
    pub location: Option<String>,
}

impl MediaItemRow {
    /// A row with the given identity and every other column at its default
    pub fn new(id: i64, title: impl Into<String>, album_id: i64) -> Self {
        Self {
            id,
            title: title.into(),
            album_id,
            ..Self::default()
        }
    }
}

/// Row of the playlists table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistRow {
    /// Persistent ID
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub master: bool,

    /// Comma separated uppercase hex persistent IDs of the member tracks
    pub items: String,
}

impl PlaylistRow {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_items(mut self, items: impl Into<String>) -> Self {
        self.items = items.into();
        self
    }
}

/// Source of library rows
///
/// Scans hand each row to `visit` in source order and stop at the first
/// error the visitor returns.
pub trait RowSource {
    /// Visit every media item row once
    fn scan_media_items(&self, visit: &mut dyn FnMut(MediaItemRow) -> Result<()>) -> Result<()>;

    /// Visit every playlist row once
    fn scan_playlists(&self, visit: &mut dyn FnMut(PlaylistRow) -> Result<()>) -> Result<()>;

    /// Look up an artist by id
    fn artist(&self, id: i64) -> Result<Option<ArtistRow>>;

    /// Look up an album by id
    fn album(&self, id: i64) -> Result<Option<AlbumRow>>;
}
