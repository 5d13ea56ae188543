//! Relational rows to in-memory library
//!
//! Allocates dense IDs, resolves artist/album lookups through memo caches
//! and decodes playlist item lists.

mod builder;
mod cache;
mod remapper;

pub use builder::{decode_items, LibraryBuilder};
pub use cache::{AlbumCache, AlbumFields, ArtistCache};
pub use remapper::IdRemapper;
