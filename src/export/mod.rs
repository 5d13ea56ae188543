//! Library XML export

pub mod config;
pub mod filter;
pub mod hierarchy;
pub mod output;
pub mod pipeline;
pub mod plist;

pub use config::ExportConfig;
pub use filter::{AllTracks, RatingFilter, TrackFilter};
pub use pipeline::{ExportPipeline, ExportSummary};
pub use self::plist::{render, serialize, RenderedLibrary};
