use super::{Playlist, Track};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Fixed header values written at the top of the library file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryMetadata {
    pub major_version: i64,
    pub minor_version: i64,

    /// Version string of the application that "wrote" the library
    pub application_version: String,

    pub features: i64,
    pub show_content_ratings: bool,

    /// URI of the media folder (file:///...)
    pub music_folder: String,

    /// 16-digit uppercase hex identifier of the library itself
    pub library_persistent_id: String,
}

impl Default for LibraryMetadata {
    fn default() -> Self {
        Self {
            major_version: 1,
            minor_version: 1,
            application_version: "1.3.0.117".to_string(),
            features: 5,
            show_content_ratings: true,
            music_folder: "file:///Users/Shared/Music/Media.localized/".to_string(),
            library_persistent_id: "6D0977E01EAF3C87".to_string(),
        }
    }
}

/// Complete music library containing tracks and playlists
///
/// Playlists are kept in a flat vector. Parent/child relations are a side
/// table from parent persistent ID to child indices, so the playlist
/// records themselves never change once added.
#[derive(Debug, Clone)]
pub struct Library {
    /// Header values
    pub metadata: LibraryMetadata,

    /// Generation timestamp
    pub date: DateTime<Utc>,

    /// All tracks indexed by their dense ID (ascending iteration order)
    tracks: BTreeMap<u32, Track>,

    /// All playlists, in ingestion order
    playlists: Vec<Playlist>,

    /// Playlist index by persistent ID
    playlist_index: HashMap<String, usize>,

    /// Parent persistent ID -> indices of its children in `playlists`
    children: HashMap<String, Vec<usize>>,
}

impl Library {
    /// Create a new empty library
    pub fn new(metadata: LibraryMetadata, date: DateTime<Utc>) -> Self {
        Self {
            metadata,
            date,
            tracks: BTreeMap::new(),
            playlists: Vec::new(),
            playlist_index: HashMap::new(),
            children: HashMap::new(),
        }
    }

    /// Add a track to the library
    pub fn add_track(&mut self, track: Track) {
        self.tracks.insert(track.id, track);
    }

    /// Add a playlist to the library
    pub fn add_playlist(&mut self, playlist: Playlist) {
        let index = self.playlists.len();
        if let Some(parent) = &playlist.parent_persistent_id {
            self.children.entry(parent.clone()).or_default().push(index);
        }
        self.playlist_index
            .insert(playlist.persistent_id.clone(), index);
        self.playlists.push(playlist);
    }

    /// Get a track by dense ID
    pub fn get_track(&self, id: u32) -> Option<&Track> {
        self.tracks.get(&id)
    }

    /// Get a playlist by persistent ID
    pub fn get_playlist(&self, persistent_id: &str) -> Option<&Playlist> {
        self.playlist_index
            .get(persistent_id)
            .map(|&index| &self.playlists[index])
    }

    /// Get all tracks, in ascending ID order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Get all playlists
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Whether at least one other playlist names this one as its parent
    pub fn is_folder(&self, playlist: &Playlist) -> bool {
        self.children
            .get(&playlist.persistent_id)
            .is_some_and(|children| !children.is_empty())
    }

    /// Total number of tracks
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Total number of playlists
    pub fn playlist_count(&self) -> usize {
        self.playlists.len()
    }
}
