//! iTunes XML Exporter - media library to iTunes "Library.xml"
//!
//! This library reads tracks and playlists from a media library database
//! and writes them as an iTunes-compatible property list, the format DJ
//! software and older players import libraries from.

pub mod error;
pub mod export;
pub mod ingest;
pub mod model;
pub mod source;
pub mod validation;

pub use error::{DataIntegrityError, ReferenceKind};
pub use export::config::ExportConfig;
pub use export::pipeline::{ExportPipeline, ExportSummary};
pub use ingest::LibraryBuilder;
pub use source::{MemorySource, RowSource, SqliteSource};
