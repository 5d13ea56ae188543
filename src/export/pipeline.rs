//! Main export pipeline orchestration

use super::config::ExportConfig;
use super::output::write_atomically;
use super::plist;
use crate::ingest::LibraryBuilder;
use crate::model::Library;
use crate::source::RowSource;
use crate::validation::validate_export;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// What an export wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub tracks_written: usize,
    pub playlists_written: usize,
    pub bytes: usize,
}

/// Main export pipeline: rows -> library -> XML file
pub struct ExportPipeline {
    config: ExportConfig,
    clock: Option<DateTime<Utc>>,
}

impl ExportPipeline {
    /// Create a new export pipeline
    pub fn new(config: ExportConfig) -> Result<Self> {
        if config.output_path.as_os_str().is_empty() {
            anyhow::bail!("Output path is empty");
        }

        Ok(Self {
            config,
            clock: None,
        })
    }

    /// Stamp the library with a fixed generation time
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    /// Run the complete export process
    pub fn export(&self, source: &dyn RowSource) -> Result<ExportSummary> {
        log::info!("Building in-memory representation of the library...");
        let mut builder = LibraryBuilder::new(self.config.metadata.clone());
        if let Some(now) = self.clock {
            builder = builder.with_clock(now);
        }
        let library = builder.build(source).context("Failed to build library")?;

        self.export_library(&library)
    }

    /// Serialize an already built library and write it out
    pub fn export_library(&self, library: &Library) -> Result<ExportSummary> {
        log::info!("Writing XML to {:?}", self.config.output_path);

        let filter = self.config.track_filter();
        let rendered = plist::render(library, filter.as_ref())
            .context("Failed to serialize library")?;

        write_atomically(&self.config.output_path, &rendered.xml)?;

        let summary = ExportSummary {
            tracks_written: rendered.tracks_written,
            playlists_written: rendered.playlists_written,
            bytes: rendered.xml.len(),
        };
        log::info!(
            "Exported {} of {} tracks, {} of {} playlists",
            summary.tracks_written,
            library.track_count(),
            summary.playlists_written,
            library.playlist_count()
        );

        if self.config.validate {
            log::info!("Running post-export validation...");
            let report = validate_export(&self.config.output_path)?;
            log::info!(
                "Validation passed: {} tracks, {} playlists, {} items",
                report.track_count,
                report.playlist_count,
                report.item_count
            );
        }

        Ok(summary)
    }
}
