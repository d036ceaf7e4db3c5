//! Custom error types for QuickBackup
//!
//! This module defines the error hierarchy for the backup and restore
//! pipelines using thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for QuickBackup operations
#[derive(Error, Debug)]
pub enum QuickBackupError {
    /// An input path did not exist when the backup started
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Failure while building the archive container
    #[error("Archive write error: {0}")]
    ArchiveWrite(String),

    /// Failure while parsing the archive container
    #[error("Archive read error: {0}")]
    ArchiveRead(String),

    /// Unexpected cipher failure while encrypting
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Wrong passphrase or corrupted data. Deliberately carries no detail.
    #[error("Decryption failed: invalid passphrase or corrupted data")]
    Decryption,

    /// An extracted file could not be written
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors outside the archive stages
    #[error("I/O error: {0}")]
    Io(String),
}

impl QuickBackupError {
    /// Create a "path not found" error
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::PathNotFound(path.into())
    }
}

impl From<std::io::Error> for QuickBackupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for QuickBackupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for QuickBackup operations
pub type QuickBackupResult<T> = Result<T, QuickBackupError>;
