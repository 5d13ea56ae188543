//! Round-trip validation of a written library file

use anyhow::{Context, Result};
use plist::{Dictionary, Value};
use std::collections::HashSet;
use std::path::Path;

/// Summary of a validated library file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationReport {
    pub track_count: usize,
    pub playlist_count: usize,
    pub item_count: usize,
}

/// Parse a plist XML document
pub fn parse_plist(xml: &str) -> Result<Value> {
    Value::from_reader_xml(xml.as_bytes()).context("Failed to parse library XML")
}

fn string_field<'a>(dict: &'a Dictionary, key: &str) -> Option<&'a str> {
    dict.get(key).and_then(Value::as_string)
}

fn integer_field(dict: &Dictionary, key: &str) -> Option<i64> {
    dict.get(key).and_then(Value::as_signed_integer)
}

/// Check references inside a library document
///
/// Every playlist item must name a track present in the Tracks dictionary,
/// and every parent must appear earlier in the Playlists array.
pub fn validate_document(xml: &str) -> Result<ValidationReport> {
    let value = parse_plist(xml)?;
    let root = value.as_dictionary().context("Root is not a dictionary")?;

    let tracks = root
        .get("Tracks")
        .context("No Tracks key")?
        .as_dictionary()
        .context("Tracks is not a dictionary")?;

    let mut track_ids = HashSet::new();
    for (key, track) in tracks {
        let id: i64 = key
            .parse()
            .with_context(|| format!("Track key {:?} is not an integer", key))?;
        let track = track
            .as_dictionary()
            .with_context(|| format!("Track {} is not a dictionary", key))?;
        let track_id = integer_field(track, "Track ID")
            .with_context(|| format!("Track {} has no Track ID", key))?;
        if track_id != id {
            anyhow::bail!("Track {} carries Track ID {}", key, track_id);
        }
        track_ids.insert(id);
    }

    let playlists = root
        .get("Playlists")
        .context("No Playlists key")?
        .as_array()
        .context("Playlists is not an array")?;
    let playlists: Vec<&Dictionary> = playlists
        .iter()
        .map(|p| p.as_dictionary().context("Playlist is not a dictionary"))
        .collect::<Result<_>>()?;

    let all_persistent_ids: HashSet<&str> = playlists
        .iter()
        .filter_map(|p| string_field(p, "Playlist Persistent ID"))
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut item_count = 0;
    for playlist in &playlists {
        let name = string_field(playlist, "Name").unwrap_or("<unnamed>");
        let persistent_id = string_field(playlist, "Playlist Persistent ID")
            .with_context(|| format!("Playlist {:?} has no persistent ID", name))?;

        if let Some(parent) = string_field(playlist, "Parent Persistent ID") {
            if !all_persistent_ids.contains(parent) {
                anyhow::bail!("Playlist {:?} references unknown parent {}", name, parent);
            }
            if !seen.contains(parent) {
                anyhow::bail!("Playlist {:?} appears before its parent {}", name, parent);
            }
        }

        if let Some(items) = playlist.get("Playlist Items").and_then(Value::as_array) {
            for item in items {
                let track_id = item
                    .as_dictionary()
                    .and_then(|item| integer_field(item, "Track ID"))
                    .with_context(|| format!("Item without Track ID in {:?}", name))?;
                if !track_ids.contains(&track_id) {
                    anyhow::bail!("Playlist {:?} references missing track {}", name, track_id);
                }
                item_count += 1;
            }
        }

        seen.insert(persistent_id);
    }

    Ok(ValidationReport {
        track_count: track_ids.len(),
        playlist_count: playlists.len(),
        item_count,
    })
}

/// Validate a library file written by the export pipeline
pub fn validate_export(path: &Path) -> Result<ValidationReport> {
    log::info!("Validating export at: {:?}", path);

    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read library XML: {:?}", path))?;
    let report = validate_document(&xml)?;

    log::debug!("Validation report: {:?}", report);
    Ok(report)
}
