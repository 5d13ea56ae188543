//! Export configuration

use super::filter::{AllTracks, RatingFilter, TrackFilter};
use crate::model::LibraryMetadata;
use std::path::PathBuf;

/// Configuration for the export process
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Destination of the library XML (e.g. ~/Music/Library.xml)
    pub output_path: PathBuf,

    /// Header values written into the library file
    pub metadata: LibraryMetadata,

    /// Only export tracks rated at least this much (0-100, None = all tracks)
    pub min_rating: Option<i64>,

    /// Whether album-derived (computed) ratings count towards `min_rating`
    pub include_computed: bool,

    /// Re-read the written file and check its references
    pub validate: bool,
}

impl ExportConfig {
    /// Create a new export configuration
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            output_path,
            metadata: LibraryMetadata::default(),
            min_rating: None,
            include_computed: false,
            validate: false,
        }
    }

    /// Set the media folder URI
    pub fn with_music_folder(mut self, music_folder: String) -> Self {
        self.metadata.music_folder = music_folder;
        self
    }

    /// Set the library persistent ID
    pub fn with_library_id(mut self, library_persistent_id: String) -> Self {
        self.metadata.library_persistent_id = library_persistent_id;
        self
    }

    /// Restrict the export to tracks rated at least `min_rating`
    pub fn with_min_rating(mut self, min_rating: i64, include_computed: bool) -> Self {
        self.min_rating = Some(min_rating);
        self.include_computed = include_computed;
        self
    }

    /// Validate the written file after export
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// The track filter described by this configuration
    pub fn track_filter(&self) -> Box<dyn TrackFilter> {
        match self.min_rating {
            Some(min_rating) => Box::new(RatingFilter {
                min_rating,
                include_computed: self.include_computed,
            }),
            None => Box::new(AllTracks),
        }
    }
}
