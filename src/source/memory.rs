//! In-memory row source

use super::{AlbumRow, ArtistRow, MediaItemRow, PlaylistRow, RowSource};
use anyhow::Result;
use std::cell::Cell;
use std::collections::HashMap;

/// Rows held in memory, e.g. already fetched by the caller
///
/// Counts point lookups so callers can see how often the builder hit the
/// artists and albums tables.
#[derive(Debug, Default)]
pub struct MemorySource {
    media_items: Vec<MediaItemRow>,
    playlists: Vec<PlaylistRow>,
    artists: HashMap<i64, ArtistRow>,
    albums: HashMap<i64, AlbumRow>,
    artist_lookups: Cell<usize>,
    album_lookups: Cell<usize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artist(mut self, id: i64, name: impl Into<String>) -> Self {
        self.artists.insert(
            id,
            ArtistRow {
                id,
                name: Some(name.into()),
            },
        );
        self
    }

    pub fn with_album(mut self, album: AlbumRow) -> Self {
        self.albums.insert(album.id, album);
        self
    }

    pub fn with_media_item(mut self, item: MediaItemRow) -> Self {
        self.media_items.push(item);
        self
    }

    pub fn with_playlist(mut self, playlist: PlaylistRow) -> Self {
        self.playlists.push(playlist);
        self
    }

    /// Number of `artist` calls so far
    pub fn artist_lookups(&self) -> usize {
        self.artist_lookups.get()
    }

    /// Number of `album` calls so far
    pub fn album_lookups(&self) -> usize {
        self.album_lookups.get()
    }
}

impl RowSource for MemorySource {
    fn scan_media_items(&self, visit: &mut dyn FnMut(MediaItemRow) -> Result<()>) -> Result<()> {
        for item in &self.media_items {
            visit(item.clone())?;
        }
        Ok(())
    }

    fn scan_playlists(&self, visit: &mut dyn FnMut(PlaylistRow) -> Result<()>) -> Result<()> {
        for playlist in &self.playlists {
            visit(playlist.clone())?;
        }
        Ok(())
    }

    fn artist(&self, id: i64) -> Result<Option<ArtistRow>> {
        self.artist_lookups.set(self.artist_lookups.get() + 1);
        Ok(self.artists.get(&id).cloned())
    }

    fn album(&self, id: i64) -> Result<Option<AlbumRow>> {
        self.album_lookups.set(self.album_lookups.get() + 1);
        Ok(self.albums.get(&id).cloned())
    }
}
