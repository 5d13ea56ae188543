use serde::{Deserialize, Serialize};

/// Represents a playlist or playlist folder
///
/// Folder status is not stored here; it is derived from the parent
/// references of the other playlists (see [`super::Library::is_folder`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    /// Dense identifier, drawn from the same counter as track ids
    pub id: u32,

    /// 16-digit uppercase hex form of the source row id
    pub persistent_id: String,

    /// Persistent ID of the containing folder, `None` for roots
    pub parent_persistent_id: Option<String>,

    /// Playlist name
    pub name: String,

    pub description: String,

    /// Whether this is the master "Library" playlist
    pub is_master: bool,

    pub visible: bool,

    pub all_items: bool,

    /// Dense track ids, in playlist order
    pub items: Vec<u32>,
}

impl Playlist {
    /// Create a new empty root playlist
    pub fn new(id: u32, persistent_id: String, name: String) -> Self {
        Self {
            id,
            persistent_id,
            parent_persistent_id: None,
            name,
            description: String::new(),
            is_master: false,
            visible: true,
            all_items: true,
            items: Vec::new(),
        }
    }

    /// Place this playlist inside the folder with the given persistent ID
    pub fn with_parent(mut self, parent_persistent_id: String) -> Self {
        self.parent_persistent_id = Some(parent_persistent_id);
        self
    }

    /// Mark this playlist as the master playlist (which is never visible)
    pub fn as_master(mut self) -> Self {
        self.is_master = true;
        self.visible = false;
        self
    }

    /// Add a track to this playlist
    pub fn add_track(&mut self, track_id: u32) {
        self.items.push(track_id);
    }
}

impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Playlist {}
