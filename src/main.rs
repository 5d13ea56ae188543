use anyhow::Result;
use clap::Parser;
use itunes_xml_exporter::source::SqliteSource;
use itunes_xml_exporter::validation::validate_export;
use itunes_xml_exporter::{ExportConfig, ExportPipeline};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "itunes-xml-export")]
#[command(about = "Export a media library database to iTunes Library.xml", long_about = None)]
struct Args {
    /// Path to the library database (SQLite)
    #[arg(short = 'd', long, default_value = "~/Music/Library.sqlite")]
    database: String,

    /// Where to write the library XML
    #[arg(short = 'o', long, default_value = "~/Music/iTunes Music Library.xml")]
    output: String,

    /// Only export tracks rated at least this much (0-100)
    #[arg(long)]
    min_rating: Option<i64>,

    /// Let album-derived ratings satisfy --min-rating
    #[arg(long, requires = "min_rating")]
    include_computed: bool,

    /// Media folder URI written into the header
    #[arg(long)]
    music_folder: Option<String>,

    /// Library persistent ID written into the header (16 hex digits)
    #[arg(long)]
    library_id: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Only validate an existing export (don't create new export)
    #[arg(long)]
    validate: bool,

    /// Skip the post-export validation pass
    #[arg(long, conflicts_with = "validate")]
    no_validate: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let output = PathBuf::from(shellexpand::tilde(&args.output).as_ref());

    if args.validate {
        log::info!("Validation mode - checking existing export...");
        let report = validate_export(&output)?;
        log::info!(
            "Validation completed: {} tracks, {} playlists, {} items",
            report.track_count,
            report.playlist_count,
            report.item_count
        );
        return Ok(());
    }

    let db_path = PathBuf::from(shellexpand::tilde(&args.database).as_ref());
    log::info!("Opening library database: {:?}", db_path);
    let source = SqliteSource::open(&db_path)?;

    let mut config = ExportConfig::new(output.clone()).with_validation(!args.no_validate);
    if let Some(min_rating) = args.min_rating {
        log::info!(
            "Filtering to tracks rated {} or more{}",
            min_rating,
            if args.include_computed { " (computed ratings included)" } else { "" }
        );
        config = config.with_min_rating(min_rating, args.include_computed);
    }
    if let Some(music_folder) = args.music_folder {
        config = config.with_music_folder(music_folder);
    }
    if let Some(library_id) = args.library_id {
        config = config.with_library_id(library_id);
    }

    let pipeline = ExportPipeline::new(config)?;
    let summary = pipeline.export(&source)?;

    log::info!(
        "Export completed: {} tracks, {} playlists, {} bytes",
        summary.tracks_written,
        summary.playlists_written,
        summary.bytes
    );
    log::info!("Library XML ready at: {:?}", output);

    Ok(())
}
