//! Output file handling

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `contents` in one step
///
/// The document is written to a temporary file next to `path` and renamed
/// over it, so readers see either the old library or the new one. The
/// temporary file is removed if anything fails before the rename.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {:?}", dir))?;

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
    file.write_all(contents.as_bytes())
        .context("Failed to write library XML")?;
    file.as_file().sync_all()?;

    file.persist(path)
        .with_context(|| format!("Failed to move library XML into place: {:?}", path))?;

    log::debug!("Wrote {} bytes to {:?}", contents.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_file_and_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("Library.xml");

        write_atomically(&path, "<plist/>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<plist/>");
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Library.xml");
        fs::write(&path, "old").unwrap();

        write_atomically(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");

        let leftovers = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
