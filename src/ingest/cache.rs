//! Memoizing lookups into the artists and albums tables
//!
//! Both caches live for a single build. Only rows that were found are
//! remembered; a missing artist or album is looked up again next time.

use crate::source::RowSource;
use anyhow::Result;
use std::collections::HashMap;

/// Values every track of an album inherits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlbumFields {
    pub disc_number: Option<i64>,
    pub rating: Option<i64>,
    pub rating_computed: bool,
}

impl AlbumFields {
    /// Fields used when the album row does not exist
    pub const MISSING: AlbumFields = AlbumFields {
        disc_number: None,
        rating: None,
        rating_computed: false,
    };
}

#[derive(Debug, Default)]
pub struct ArtistCache {
    names: HashMap<i64, Option<String>>,
}

impl ArtistCache {
    /// Artist name for `artist_id`; no id means no name and no lookup
    pub fn resolve(
        &mut self,
        source: &dyn RowSource,
        artist_id: Option<i64>,
    ) -> Result<Option<String>> {
        let Some(artist_id) = artist_id else {
            return Ok(None);
        };

        if let Some(name) = self.names.get(&artist_id) {
            return Ok(name.clone());
        }

        match source.artist(artist_id)? {
            Some(artist) => {
                self.names.insert(artist_id, artist.name.clone());
                Ok(artist.name)
            }
            None => {
                log::debug!("Artist {} not found", artist_id);
                Ok(None)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct AlbumCache {
    albums: HashMap<i64, AlbumFields>,
}

impl AlbumCache {
    /// Album-derived fields for `album_id`
    pub fn resolve(&mut self, source: &dyn RowSource, album_id: i64) -> Result<AlbumFields> {
        if let Some(fields) = self.albums.get(&album_id) {
            return Ok(*fields);
        }

        match source.album(album_id)? {
            Some(album) => {
                let fields = AlbumFields {
                    disc_number: Some(album.disc_number),
                    rating: Some(album.rating),
                    rating_computed: album.rating_computed,
                };
                self.albums.insert(album_id, fields);
                Ok(fields)
            }
            None => {
                log::debug!("Album {} not found", album_id);
                Ok(AlbumFields::MISSING)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }
}
