//! ZIP extraction for monthly archives.

use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

/// Errors that can occur while extracting an archive.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Empty response body.
    #[error("Empty archive")]
    EmptyInput,

    /// The body is not a readable ZIP container.
    #[error("ZIP error: {0}")]
    Archive(#[from] ZipError),

    /// The expected entry is absent from the archive.
    #[error("Entry '{0}' not found in archive")]
    MissingEntry(String),

    /// Reading the entry or writing it to disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn open_archive(data: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>, ExtractError> {
    if data.is_empty() {
        return Err(ExtractError::EmptyInput);
    }
    Ok(ZipArchive::new(Cursor::new(data))?)
}

/// Reads one named entry of a ZIP archive into memory.
///
/// # Errors
///
/// Returns an error if the archive is unreadable or the entry is absent.
pub fn extract_entry(data: &[u8], entry: &str) -> Result<Vec<u8>, ExtractError> {
    let mut archive = open_archive(data)?;

    let mut file = match archive.by_name(entry) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Err(ExtractError::MissingEntry(entry.to_string())),
        Err(e) => return Err(e.into()),
    };

    let mut contents = Vec::with_capacity(usize::try_from(file.size()).unwrap_or_default());
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// Extracts every entry of a ZIP archive into `dir` and returns the path
/// of the named entry on disk.
///
/// The directory is created if missing. The entry's presence is checked
/// before anything is written.
///
/// # Errors
///
/// Returns an error if the archive is unreadable, the entry is absent,
/// or writing fails.
pub fn extract_to_dir(data: &[u8], entry: &str, dir: &Path) -> Result<PathBuf, ExtractError> {
    let mut archive = open_archive(data)?;

    if archive.index_for_name(entry).is_none() {
        return Err(ExtractError::MissingEntry(entry.to_string()));
    }

    fs::create_dir_all(dir)?;
    archive.extract(dir)?;
    Ok(dir.join(entry))
}
