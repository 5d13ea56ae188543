//! In-memory library graph
//!
//! These structures are independent of both the input (database rows)
//! and the output (plist XML) formats.

mod library;
mod playlist;
mod track;

pub use library::{Library, LibraryMetadata};
pub use playlist::Playlist;
pub use track::{persistent_id_hex, Track, DEFAULT_KIND};
