//! Library XML writer
//!
//! Writes the property-list dialect the Music app reads as `Library.xml`.
//! Key order, indentation and which keys are omitted all matter to the
//! importer, so the document is built line by line instead of going
//! through a generic plist encoder.

use super::filter::TrackFilter;
use super::hierarchy;
use crate::error::DataIntegrityError;
use crate::model::{Library, Playlist, Track};
use chrono::{DateTime, Utc};
use quick_xml::escape::escape;
use std::fmt::Write;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple Computer//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
"#;

const FOOTER: &str = "</dict>\n</plist>\n";

/// Name of the playlist the Music app treats as its "Music" library
const MUSIC_PLAYLIST: &str = "Music";

/// Serialized library plus what ended up in it
#[derive(Debug, Clone)]
pub struct RenderedLibrary {
    pub xml: String,
    pub tracks_written: usize,
    pub playlists_written: usize,
}

/// Serialize `library`, keeping only tracks accepted by `filter`
pub fn serialize(
    library: &Library,
    filter: &dyn TrackFilter,
) -> Result<String, DataIntegrityError> {
    render(library, filter).map(|rendered| rendered.xml)
}

/// Like [`serialize`], but also reports how many tracks and playlists were written
///
/// Playlists with no surviving items are skipped unless they are folders;
/// a folder is always written because its children point at it. Every
/// written playlist carries a `Playlist Items` array, empty or not.
pub fn render(
    library: &Library,
    filter: &dyn TrackFilter,
) -> Result<RenderedLibrary, DataIntegrityError> {
    let mut out = PlistWriter::new();
    out.raw(HEADER);

    let metadata = &library.metadata;
    out.integer(1, "Major Version", metadata.major_version);
    out.integer(1, "Minor Version", metadata.minor_version);
    out.date(1, "Date", &library.date);
    out.string(1, "Application Version", &metadata.application_version);
    out.integer(1, "Features", metadata.features);
    out.boolean(1, "Show Content Ratings", metadata.show_content_ratings);
    out.string(1, "Music Folder", &metadata.music_folder);
    out.string(1, "Library Persistent ID", &metadata.library_persistent_id);

    log::debug!("Writing tracks...");
    out.key(1, "Tracks");
    out.line(1, "<dict>");
    let mut tracks_written = 0;
    for track in library.tracks().filter(|t| filter.accepts(t)) {
        write_track(&mut out, track);
        tracks_written += 1;
    }
    out.line(1, "</dict>");

    log::debug!("Writing playlists...");
    out.key(1, "Playlists");
    out.line(1, "<array>");
    let mut playlists_written = 0;
    for playlist in hierarchy::order(library)? {
        let items = surviving_items(library, playlist, filter)?;
        let is_folder = library.is_folder(playlist);

        if items.is_empty() && !is_folder {
            log::debug!("Skipping playlist with no exported tracks: {}", playlist.name);
            continue;
        }

        write_playlist(&mut out, playlist, is_folder, &items);
        playlists_written += 1;
    }
    out.line(1, "</array>");
    out.raw(FOOTER);

    Ok(RenderedLibrary {
        xml: out.finish(),
        tracks_written,
        playlists_written,
    })
}

fn write_track(out: &mut PlistWriter, track: &Track) {
    out.key(2, &track.id.to_string());
    out.line(2, "<dict>");

    out.integer(3, "Track ID", track.id as i64);
    out.string(3, "Name", &track.name);
    if let Some(artist) = &track.artist {
        out.string(3, "Artist", artist);
    }
    // Composer goes out under "Artist" too; existing library files carry it that way.
    if let Some(composer) = &track.composer {
        out.string(3, "Artist", composer);
    }
    out.string(3, "Kind", &track.kind);
    out.optional_integer(3, "Size", track.size);
    out.optional_integer(3, "Total Time", track.total_time);
    out.optional_integer(3, "Disc Number", track.disc_number);
    out.optional_integer(3, "Track Number", track.track_number);
    out.optional_integer(3, "Year", track.year);
    if let Some(bpm) = track.bpm.filter(|&bpm| bpm > 0) {
        out.integer(3, "BPM", bpm);
    }
    if let Some(date_modified) = &track.date_modified {
        out.date(3, "Date Modified", date_modified);
    }
    out.date(3, "Date Added", &track.date_added);
    out.optional_integer(3, "Bit Rate", track.bit_rate);
    out.optional_integer(3, "Sample Rate", track.sample_rate);
    if let Some(comments) = &track.comments {
        out.string(3, "Comments", comments);
    }
    if track.rating > 0 {
        out.integer(3, "Rating", track.rating);
    }
    if track.rating_computed {
        out.boolean(3, "Rating Computed", true);
    }
    out.optional_integer(3, "Album Rating", track.album_rating);
    if let Some(computed) = track.album_rating_computed {
        out.boolean(3, "Album Rating Computed", computed);
    }
    out.optional_integer(3, "Normalization", track.normalization);
    out.string(3, "Persistent ID", &track.persistent_id);
    out.string(3, "Track Type", &track.track_type);
    out.string(3, "Location", &track.location);
    out.integer(3, "File Folder Count", -1);
    out.integer(3, "Library Folder Count", -1);

    out.line(2, "</dict>");
}

fn write_playlist(out: &mut PlistWriter, playlist: &Playlist, is_folder: bool, items: &[u32]) {
    out.line(2, "<dict>");

    out.string(3, "Name", &playlist.name);
    out.string(3, "Description", &playlist.description);
    if playlist.is_master {
        out.boolean(3, "Master", true);
    }
    out.integer(3, "Playlist ID", playlist.id as i64);
    out.string(3, "Playlist Persistent ID", &playlist.persistent_id);
    if let Some(parent) = &playlist.parent_persistent_id {
        out.string(3, "Parent Persistent ID", parent);
    }
    if !playlist.visible {
        out.boolean(3, "Visible", false);
    }
    if playlist.name == MUSIC_PLAYLIST {
        out.integer(3, "Distinguished Kind", 4);
        out.boolean(3, "Music", true);
    }
    out.boolean(3, "All Items", playlist.all_items);
    if is_folder {
        out.boolean(3, "Folder", true);
    }

    out.key(3, "Playlist Items");
    out.line(3, "<array>");
    for track_id in items {
        out.line(4, "<dict>");
        out.integer(5, "Track ID", *track_id as i64);
        out.line(4, "</dict>");
    }
    out.line(3, "</array>");

    out.line(2, "</dict>");
}

/// Items of `playlist` accepted by `filter`, in playlist order
fn surviving_items(
    library: &Library,
    playlist: &Playlist,
    filter: &dyn TrackFilter,
) -> Result<Vec<u32>, DataIntegrityError> {
    let mut items = Vec::with_capacity(playlist.items.len());
    for &track_id in &playlist.items {
        let track = library
            .get_track(track_id)
            .ok_or_else(|| DataIntegrityError::unresolved_track(track_id.to_string()))?;
        if filter.accepts(track) {
            items.push(track_id);
        }
    }
    Ok(items)
}

/// `2024-01-31T12:00:00Z`, always in UTC
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Tab-indented line writer for plist elements
struct PlistWriter {
    out: String,
}

impl PlistWriter {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push('\t');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn key(&mut self, depth: usize, key: &str) {
        self.line(depth, &format!("<key>{}</key>", escape(key)));
    }

    fn entry(&mut self, depth: usize, key: &str, value: std::fmt::Arguments) {
        let mut text = String::new();
        // Writing into a String cannot fail.
        let _ = write!(text, "<key>{}</key>{}", escape(key), value);
        self.line(depth, &text);
    }

    fn string(&mut self, depth: usize, key: &str, value: &str) {
        self.entry(depth, key, format_args!("<string>{}</string>", escape(value)));
    }

    fn integer(&mut self, depth: usize, key: &str, value: i64) {
        self.entry(depth, key, format_args!("<integer>{}</integer>", value));
    }

    fn optional_integer(&mut self, depth: usize, key: &str, value: Option<i64>) {
        if let Some(value) = value {
            self.integer(depth, key, value);
        }
    }

    fn boolean(&mut self, depth: usize, key: &str, value: bool) {
        self.entry(depth, key, format_args!("<{}/>", value));
    }

    fn date(&mut self, depth: usize, key: &str, value: &DateTime<Utc>) {
        self.entry(depth, key, format_args!("<date>{}</date>", format_date(value)));
    }

    fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::filter::AllTracks;
    use crate::model::LibraryMetadata;
    use chrono::TimeZone;

    fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 8, 7, 6).unwrap()
    }

    fn track(id: u32, name: &str) -> Track {
        Track {
            id,
            persistent_id: format!("{:016X}", id),
            name: name.to_string(),
            artist: None,
            composer: None,
            grouping: None,
            kind: "MPEG audio file".to_string(),
            size: None,
            total_time: None,
            disc_number: None,
            track_number: None,
            year: None,
            bpm: None,
            date_modified: None,
            date_added: clock(),
            bit_rate: None,
            sample_rate: None,
            comments: None,
            rating: 0,
            rating_computed: false,
            album_rating: None,
            album_rating_computed: None,
            normalization: None,
            track_type: String::new(),
            location: String::new(),
        }
    }

    fn library_with(tracks: Vec<Track>) -> Library {
        let mut library = Library::new(LibraryMetadata::default(), clock());
        for track in tracks {
            library.add_track(track);
        }
        library
    }

    #[test]
    fn test_format_date_is_utc() {
        assert_eq!(format_date(&clock()), "2024-03-09T08:07:06Z");
    }

    #[test]
    fn test_header_and_top_level_order() {
        let xml = serialize(&library_with(vec![]), &AllTracks).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE plist"));
        assert!(xml.ends_with("\t</array>\n</dict>\n</plist>\n"));

        let keys = [
            "Major Version",
            "Minor Version",
            "Date",
            "Application Version",
            "Features",
            "Show Content Ratings",
            "Music Folder",
            "Library Persistent ID",
            "Tracks",
            "Playlists",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|key| xml.find(&format!("\t<key>{}</key>", key)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(xml.contains("\t<key>Date</key><date>2024-03-09T08:07:06Z</date>\n"));
        assert!(xml.contains("\t<key>Show Content Ratings</key><true/>\n"));
    }

    #[test]
    fn test_bpm_suppressed_when_zero() {
        let mut zero = track(1, "zero");
        zero.bpm = Some(0);
        let mut fast = track(2, "fast");
        fast.bpm = Some(120);

        let xml = serialize(&library_with(vec![zero]), &AllTracks).unwrap();
        assert!(!xml.contains("<key>BPM</key>"));

        let xml = serialize(&library_with(vec![fast]), &AllTracks).unwrap();
        assert!(xml.contains("<key>BPM</key><integer>120</integer>"));
    }

    #[test]
    fn test_rating_keys() {
        let mut unrated = track(1, "unrated");
        unrated.album_rating_computed = Some(false);
        let xml = serialize(&library_with(vec![unrated]), &AllTracks).unwrap();
        assert!(!xml.contains("<key>Rating</key>"));
        assert!(!xml.contains("<key>Rating Computed</key>"));
        assert!(xml.contains("<key>Album Rating Computed</key><false/>"));

        let mut rated = track(1, "rated");
        rated.rating = 60;
        rated.rating_computed = true;
        let xml = serialize(&library_with(vec![rated]), &AllTracks).unwrap();
        assert!(xml.contains("<key>Rating</key><integer>60</integer>"));
        assert!(xml.contains("<key>Rating Computed</key><true/>"));
        assert!(!xml.contains("<key>Album Rating Computed</key>"));
    }

    #[test]
    fn test_strings_are_escaped() {
        let mut t = track(1, "Rock & Roll <Live>");
        t.comments = Some("\"quoted\" & 'single'".to_string());
        let xml = serialize(&library_with(vec![t]), &AllTracks).unwrap();

        assert!(xml.contains("<key>Name</key><string>Rock &amp; Roll &lt;Live&gt;</string>"));
        assert!(xml.contains(
            "<key>Comments</key><string>&quot;quoted&quot; &amp; &apos;single&apos;</string>"
        ));
    }

    #[test]
    fn test_composer_written_as_second_artist() {
        let mut t = track(1, "Song");
        t.artist = Some("Performer".to_string());
        t.composer = Some("Writer".to_string());
        let xml = serialize(&library_with(vec![t]), &AllTracks).unwrap();

        let performer = xml.find("<key>Artist</key><string>Performer</string>").unwrap();
        let writer = xml.find("<key>Artist</key><string>Writer</string>").unwrap();
        assert!(performer < writer);
    }

    #[test]
    fn test_track_block_layout() {
        let xml = serialize(&library_with(vec![track(7, "Solo")]), &AllTracks).unwrap();
        let expected = "\t<key>Tracks</key>\n\
            \t<dict>\n\
            \t\t<key>7</key>\n\
            \t\t<dict>\n\
            \t\t\t<key>Track ID</key><integer>7</integer>\n\
            \t\t\t<key>Name</key><string>Solo</string>\n\
            \t\t\t<key>Kind</key><string>MPEG audio file</string>\n\
            \t\t\t<key>Date Added</key><date>2024-03-09T08:07:06Z</date>\n\
            \t\t\t<key>Persistent ID</key><string>0000000000000007</string>\n\
            \t\t\t<key>Track Type</key><string></string>\n\
            \t\t\t<key>Location</key><string></string>\n\
            \t\t\t<key>File Folder Count</key><integer>-1</integer>\n\
            \t\t\t<key>Library Folder Count</key><integer>-1</integer>\n\
            \t\t</dict>\n\
            \t</dict>\n";
        assert!(xml.contains(expected), "unexpected layout:\n{}", xml);
    }

    #[test]
    fn test_filter_restricts_tracks_and_items() {
        let mut library = library_with(vec![track(1, "keep"), track(2, "drop")]);
        let mut playlist = Playlist::new(3, "00000000000000A0".into(), "Mixed".into());
        playlist.add_track(2);
        playlist.add_track(1);
        library.add_playlist(playlist);

        let keep = |t: &Track| t.name == "keep";
        let rendered = render(&library, &keep).unwrap();

        assert_eq!(rendered.tracks_written, 1);
        assert_eq!(rendered.playlists_written, 1);
        assert!(!rendered.xml.contains("<key>2</key>"));
        assert!(rendered.xml.contains(
            "\t\t\t\t<dict>\n\t\t\t\t\t<key>Track ID</key><integer>1</integer>\n\t\t\t\t</dict>\n"
        ));
        assert!(!rendered.xml.contains("<key>Track ID</key><integer>2</integer>"));
    }

    #[test]
    fn test_playlist_emptied_by_filter_is_skipped() {
        let mut library = library_with(vec![track(1, "drop")]);
        let mut playlist = Playlist::new(2, "00000000000000A0".into(), "Gone".into());
        playlist.add_track(1);
        library.add_playlist(playlist);

        let rendered = render(&library, &|_: &Track| false).unwrap();
        assert_eq!(rendered.playlists_written, 0);
        assert!(!rendered.xml.contains("Gone"));
    }

    #[test]
    fn test_folder_without_items_writes_empty_array() {
        let mut library = library_with(vec![track(1, "t")]);
        library.add_playlist(Playlist::new(2, "00000000000000A0".into(), "Crate".into()));
        let mut child = Playlist::new(3, "00000000000000B0".into(), "Child".into())
            .with_parent("00000000000000A0".into());
        child.add_track(1);
        library.add_playlist(child);

        let rendered = render(&library, &AllTracks).unwrap();
        assert_eq!(rendered.playlists_written, 2);
        assert!(rendered.xml.contains(
            "\t\t\t<key>Folder</key><true/>\n\
             \t\t\t<key>Playlist Items</key>\n\
             \t\t\t<array>\n\
             \t\t\t</array>\n\
             \t\t</dict>\n"
        ));
    }

    #[test]
    fn test_music_playlist_flags() {
        let mut library = library_with(vec![track(1, "t")]);
        let mut music = Playlist::new(2, "00000000000000A0".into(), "Music".into());
        music.add_track(1);
        library.add_playlist(music);

        let xml = serialize(&library, &AllTracks).unwrap();
        let kind = xml.find("<key>Distinguished Kind</key><integer>4</integer>").unwrap();
        let flag = xml.find("<key>Music</key><true/>").unwrap();
        let all_items = xml.find("<key>All Items</key><true/>").unwrap();
        assert!(kind < flag && flag < all_items);
    }

    #[test]
    fn test_master_playlist_keys() {
        let mut library = library_with(vec![track(1, "t")]);
        let mut master = Playlist::new(2, "00000000000000A0".into(), "Library".into()).as_master();
        master.add_track(1);
        library.add_playlist(master);

        let xml = serialize(&library, &AllTracks).unwrap();
        assert!(xml.contains("\t\t\t<key>Master</key><true/>\n"));
        assert!(xml.contains("\t\t\t<key>Visible</key><false/>\n"));
        assert!(xml.contains("\t\t\t<key>Description</key><string></string>\n"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let mut library = library_with(vec![track(1, "a"), track(2, "b")]);
        let mut playlist = Playlist::new(3, "00000000000000A0".into(), "p".into());
        playlist.add_track(2);
        library.add_playlist(playlist);

        let first = serialize(&library, &AllTracks).unwrap();
        let second = serialize(&library, &AllTracks).unwrap();
        assert_eq!(first, second);
    }
}
