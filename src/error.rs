//! Data integrity errors raised while building or ordering a library
//!
//! Every variant means the source data is corrupt or out of order. None of
//! them are worth retrying.

use thiserror::Error;

/// What kind of record a dangling reference was pointing at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Track,
    Playlist,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::Track => write!(f, "track"),
            ReferenceKind::Playlist => write!(f, "playlist"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityError {
    #[error("unresolved {kind} reference {key}")]
    UnresolvedReference { kind: ReferenceKind, key: String },

    #[error("malformed item token {token:?} in playlist {playlist:?}")]
    MalformedToken { playlist: String, token: String },

    #[error("playlist {playlist} is part of a parent cycle")]
    ParentCycle { playlist: String },
}

impl DataIntegrityError {
    pub(crate) fn unresolved_track(key: impl Into<String>) -> Self {
        DataIntegrityError::UnresolvedReference {
            kind: ReferenceKind::Track,
            key: key.into(),
        }
    }

    pub(crate) fn unresolved_playlist(key: impl Into<String>) -> Self {
        DataIntegrityError::UnresolvedReference {
            kind: ReferenceKind::Playlist,
            key: key.into(),
        }
    }
}
