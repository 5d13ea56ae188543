use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind reported for media items whose source row has no kind
pub const DEFAULT_KIND: &str = "MPEG audio file";

/// Represents a single media item with all its exported metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Dense, 1-based identifier assigned during ingestion
    pub id: u32,

    /// 16-digit uppercase hex form of the source row id
    pub persistent_id: String,

    /// Track title
    pub name: String,

    /// Artist name, resolved through the artists table
    pub artist: Option<String>,

    pub composer: Option<String>,

    pub grouping: Option<String>,

    /// File kind (e.g. "MPEG audio file")
    pub kind: String,

    /// File size in bytes
    pub size: Option<i64>,

    /// Duration in milliseconds
    pub total_time: Option<i64>,

    /// Disc number, inherited from the album
    pub disc_number: Option<i64>,

    pub track_number: Option<i64>,

    pub year: Option<i64>,

    /// Beats per minute (0 means unknown)
    pub bpm: Option<i64>,

    pub date_modified: Option<DateTime<Utc>>,

    /// Falls back to the build time when the source has no value
    pub date_added: DateTime<Utc>,

    pub bit_rate: Option<i64>,

    pub sample_rate: Option<i64>,

    pub comments: Option<String>,

    /// Rating on a 0-100 scale (20 per star)
    pub rating: i64,

    /// Whether the rating was derived from the album rather than set by the user
    pub rating_computed: bool,

    /// Album rating, inherited from the album
    pub album_rating: Option<i64>,

    pub album_rating_computed: Option<bool>,

    /// Volume normalization energy
    pub normalization: Option<i64>,

    /// Raw source kind, empty when unknown
    pub track_type: String,

    /// File URI (file:///...)
    pub location: String,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

/// Format a source row id the way the library file expects it
///
/// Negative ids keep their two's-complement bit pattern, so `-1` becomes
/// `FFFFFFFFFFFFFFFF`.
pub fn persistent_id_hex(raw: i64) -> String {
    format!("{:016X}", raw as u64)
}
