use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Content of a program listing read into memory
#[derive(Debug, Clone)]
pub struct FileContent {
    /// Path to the file as given
    pub path: String,
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
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid UTF-8 in file: {0}")]
    InvalidUtf8(String),
}

/// Hex-encoded BLAKE3 hash of `content`
pub fn compute_checksum(content: &str) -> String {
    blake3::hash(content.as_bytes()).to_hex().to_string()
}

/// Read a file from disk with UTF-8 validation
///
/// # Arguments
/// * `path` - Path to the file to read
///
/// # Returns
/// * `Ok(FileContent)` - File content with metadata
/// * `Err(FileError)` - File not found, I/O error, or invalid UTF-8
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<FileContent, FileError> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        return Err(FileError::NotFound(path_ref.display().to_string()));
    }

    let bytes = fs::read(path_ref)?;
    let content = String::from_utf8(bytes)
        .map_err(|_| FileError::InvalidUtf8(path_ref.display().to_string()))?;

    let checksum = compute_checksum(&content);

    Ok(FileContent {
        path: path_ref.display().to_string(),
        content,
        checksum,
    })
}

/// Write `content` to `path`, returning the checksum of what was written
pub fn write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<String, FileError> {
    let path_ref = path.as_ref();
    fs::write(path_ref, content)?;
    tracing::info!(path = %path_ref.display(), bytes = content.len(), "wrote program file");
    Ok(compute_checksum(content))
}
