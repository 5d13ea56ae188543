//! Library builder
//!
//! Streams media items and then playlists out of a [`RowSource`] and
//! assembles the in-memory [`Library`]. Media items must be ingested first:
//! playlist item lists reference tracks by persistent ID and are resolved
//! through the same [`IdRemapper`].

use super::cache::{AlbumCache, AlbumFields, ArtistCache};
use super::remapper::IdRemapper;
use crate::error::DataIntegrityError;
use crate::model::{persistent_id_hex, Library, LibraryMetadata, Playlist, Track, DEFAULT_KIND};
use crate::source::{MediaItemRow, PlaylistRow, RowSource};
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Builds a [`Library`] from relational rows
#[derive(Debug, Clone)]
pub struct LibraryBuilder {
    metadata: LibraryMetadata,

    /// Generation timestamp, also used for tracks without a date added
    now: DateTime<Utc>,
}

impl LibraryBuilder {
    pub fn new(metadata: LibraryMetadata) -> Self {
        Self {
            metadata,
            now: Utc::now(),
        }
    }

    /// Use a fixed generation time instead of the current time
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Run one ingestion pass over `source`
    ///
    /// Fails with a [`DataIntegrityError`] (inside the `anyhow::Error`) when
    /// a playlist references a track or parent that does not exist, or when
    /// an item list contains something other than hex tokens.
    pub fn build(&self, source: &dyn RowSource) -> Result<Library> {
        let mut remapper = IdRemapper::new();
        let mut artists = ArtistCache::default();
        let mut albums = AlbumCache::default();
        let mut library = Library::new(self.metadata.clone(), self.now);

        log::info!("Fetching all tracks...");
        source.scan_media_items(&mut |item| {
            let artist = artists.resolve(source, item.artist_id)?;
            let album = albums.resolve(source, item.album_id)?;

            let id = remapper.next_id();
            remapper.remember(item.id, id);
            library.add_track(self.track_from_row(id, item, artist, album));
            Ok(())
        })?;
        log::debug!(
            "Resolved {} artists and {} albums",
            artists.len(),
            albums.len()
        );

        log::info!("Fetching all playlists...");
        source.scan_playlists(&mut |row| {
            let id = remapper.next_id();
            let playlist = playlist_from_row(id, row, &remapper)?;
            log::debug!(
                "Playlist {:?}: {} items",
                playlist.name,
                playlist.items.len()
            );
            library.add_playlist(playlist);
            Ok(())
        })?;

        check_parents(&library)?;
        log::debug!("Allocated {} dense IDs", remapper.allocated());

        log::info!(
            "Built library: {} tracks, {} playlists",
            library.track_count(),
            library.playlist_count()
        );
        Ok(library)
    }

    fn track_from_row(
        &self,
        id: u32,
        item: MediaItemRow,
        artist: Option<String>,
        album: AlbumFields,
    ) -> Track {
        Track {
            id,
            persistent_id: persistent_id_hex(item.id),
            name: item.title,
            artist,
            composer: item.composer,
            grouping: item.grouping,
            kind: item
                .kind
                .clone()
                .unwrap_or_else(|| DEFAULT_KIND.to_string()),
            size: Some(item.file_size),
            total_time: Some(item.total_time),
            disc_number: album.disc_number,
            track_number: Some(item.track_number),
            year: Some(item.year),
            bpm: Some(item.beats_per_minute),
            date_modified: item.modified_date,
            date_added: item.added_date.unwrap_or(self.now),
            bit_rate: Some(item.bitrate),
            sample_rate: Some(item.sample_rate),
            comments: item.comments,
            rating: item.rating,
            rating_computed: item.rating_computed,
            album_rating: album.rating,
            album_rating_computed: Some(album.rating_computed),
            normalization: Some(item.volume_normalization_energy),
            track_type: item.kind.unwrap_or_default(),
            location: item.location.unwrap_or_default(),
        }
    }
}

fn playlist_from_row(
    id: u32,
    row: PlaylistRow,
    remapper: &IdRemapper,
) -> Result<Playlist, DataIntegrityError> {
    let items = decode_items(&row.name, &row.items, remapper)?;

    let mut playlist = Playlist::new(id, persistent_id_hex(row.id), row.name);
    if let Some(parent_id) = row.parent_id {
        playlist = playlist.with_parent(persistent_id_hex(parent_id));
    }
    if row.master {
        playlist = playlist.as_master();
    }
    playlist.items = items;
    Ok(playlist)
}

/// Decode a comma separated list of hex persistent IDs into dense track IDs
///
/// Each token is an unsigned 64-bit hex number holding the bit pattern of
/// the signed persistent ID. An empty list string means no items.
pub fn decode_items(
    playlist: &str,
    items: &str,
    remapper: &IdRemapper,
) -> Result<Vec<u32>, DataIntegrityError> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    items
        .split(',')
        .map(|token| {
            let raw = u64::from_str_radix(token, 16).map_err(|_| {
                DataIntegrityError::MalformedToken {
                    playlist: playlist.to_string(),
                    token: token.to_string(),
                }
            })?;
            remapper.resolve(raw as i64)
        })
        .collect()
}

/// Every parent reference must name a playlist of the same batch
fn check_parents(library: &Library) -> Result<(), DataIntegrityError> {
    for playlist in library.playlists() {
        if let Some(parent) = &playlist.parent_persistent_id {
            if library.get_playlist(parent).is_none() {
                log::error!(
                    "Playlist {:?} references missing parent {}",
                    playlist.name,
                    parent
                );
                return Err(DataIntegrityError::unresolved_playlist(parent.clone()));
            }
        }
    }
    Ok(())
}
