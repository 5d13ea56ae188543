//! Playlist hierarchy ordering
//!
//! The library file lists playlists breadth-first: every folder appears
//! before anything inside it. The order is computed from depths alone,
//! without building a tree.

use crate::error::DataIntegrityError;
use crate::model::{Library, Playlist};
use std::collections::HashMap;

/// Number of parent hops from `playlist` to a root playlist
///
/// A chain longer than the number of playlists can only be a cycle.
pub fn depth_of(library: &Library, playlist: &Playlist) -> Result<usize, DataIntegrityError> {
    let limit = library.playlist_count();
    let mut depth = 0;
    let mut current = playlist;

    while let Some(parent_id) = &current.parent_persistent_id {
        current = library
            .get_playlist(parent_id)
            .ok_or_else(|| DataIntegrityError::unresolved_playlist(parent_id.clone()))?;
        depth += 1;

        if depth >= limit {
            return Err(DataIntegrityError::ParentCycle {
                playlist: playlist.persistent_id.clone(),
            });
        }
    }

    Ok(depth)
}

/// Depth of every playlist, keyed by dense playlist ID
pub fn depths(library: &Library) -> Result<HashMap<u32, usize>, DataIntegrityError> {
    library
        .playlists()
        .iter()
        .map(|playlist| Ok((playlist.id, depth_of(library, playlist)?)))
        .collect()
}

/// Playlists in export order
///
/// Sorted by depth, then folders before plain playlists, then by name
/// (byte-wise). The sort is stable, so full ties keep ingestion order.
pub fn order(library: &Library) -> Result<Vec<&Playlist>, DataIntegrityError> {
    let depths = depths(library)?;

    let mut ordered: Vec<&Playlist> = library.playlists().iter().collect();
    ordered.sort_by(|a, b| {
        depths[&a.id]
            .cmp(&depths[&b.id])
            .then_with(|| library.is_folder(b).cmp(&library.is_folder(a)))
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(ordered)
}
