//! Writing the EPUB zip archive.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Name of the entry that must come first and uncompressed.
const MIMETYPE: &str = "mimetype";

/// A file to place in the archive.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Path inside the archive, `/`-separated
    pub path: String,
    pub data: Vec<u8>,
}

impl Entry {
    pub fn new(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }
}

/// Write `entries` to an EPUB file at `path`, replacing any existing file.
pub fn write_epub(path: &Path, entries: &[Entry]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_epub_to_writer(file, entries)
}

/// Write `entries` as a zip archive to any seekable destination.
///
/// The `mimetype` entry is written first and stored; everything else is deflated
/// in the given order.
pub fn write_epub_to_writer<W: Write + Seek>(writer: W, entries: &[Entry]) -> Result<()> {
    let mut zip = ZipWriter::new(writer);

    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let deflated =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mimetype = entries
        .iter()
        .find(|e| e.path == MIMETYPE)
        .ok_or_else(|| anyhow::anyhow!("EPUB entries have no mimetype"))?;
    zip.start_file(MIMETYPE, stored)?;
    zip.write_all(&mimetype.data)?;

    for entry in entries.iter().filter(|e| e.path != MIMETYPE) {
        log::debug!("Adding {} ({} bytes)", entry.path, entry.data.len());
        zip.start_file(entry.path.as_str(), deflated)?;
        zip.write_all(&entry.data)?;
    }

    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn entries() -> Vec<Entry> {
        vec![
            Entry::new("OEBPS/style.css", "p {}"),
            Entry::new("mimetype", "application/epub+zip"),
            Entry::new("OEBPS/chapter_1.html", "<html/>"),
        ]
    }

    #[test]
    fn test_mimetype_first_and_stored() {
        let mut buffer = Cursor::new(Vec::new());
        write_epub_to_writer(&mut buffer, &entries()).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
        assert_eq!(archive.len(), 3);

        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), zip::CompressionMethod::Stored);
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        assert_eq!(content, "application/epub+zip");
    }

    #[test]
    fn test_other_entries_deflated_in_order() {
        let mut buffer = Cursor::new(Vec::new());
        write_epub_to_writer(&mut buffer, &entries()).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
        let second = archive.by_index(1).unwrap();
        assert_eq!(second.name(), "OEBPS/style.css");
        assert_eq!(second.compression(), zip::CompressionMethod::Deflated);
        drop(second);
        assert_eq!(archive.by_index(2).unwrap().name(), "OEBPS/chapter_1.html");
    }

    #[test]
    fn test_missing_mimetype_is_an_error() {
        let mut buffer = Cursor::new(Vec::new());
        let result = write_epub_to_writer(&mut buffer, &[Entry::new("a.txt", "a")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_write_epub_creates_parent_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dist").join("book.epub");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"stale").unwrap();

        write_epub(&path, &entries()).unwrap();

        let archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 3);
    }
}
