use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::edit::compute_checksum;

/// A document read into memory
#[derive(Debug, Clone)]
pub struct FileContent {
    /// Path the document was read from
    pub path: PathBuf,
    /// File content as valid UTF-8 string
    pub content: String,
    /// BLAKE3 hash of the content (hex-encoded)
    pub checksum: String,
}

/// Error types for file operations
#[derive(Debug, Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid UTF-8 in file: {0}")]
    InvalidUtf8(String),
}

/// Read a file from disk with UTF-8 validation
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<FileContent, FileError> {
    let path_ref = path.as_ref();
    let display = path_ref.display().to_string();

    if !path_ref.exists() {
        return Err(FileError::NotFound(display));
    }

    let bytes = fs::read(path_ref).map_err(|source| FileError::Io {
        path: display.clone(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|_| FileError::InvalidUtf8(display))?;

    Ok(FileContent {
        path: path_ref.to_path_buf(),
        checksum: compute_checksum(&content),
        content,
    })
}

/// Write `content` back to `path`
pub fn write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<(), FileError> {
    let path_ref = path.as_ref();
    fs::write(path_ref, content).map_err(|source| FileError::Io {
        path: path_ref.display().to_string(),
        source,
    })
}
