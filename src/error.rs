//! Error types
//!
//! Fatal conditions surface as `Err`; per-entry filesystem and archive problems
//! during indexing are logged and skipped by the walker instead.

use std::path::PathBuf;

/// Persistence errors (loading or saving a catalog file)
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Corrupt catalog {path}: {message}")]
    Corrupt { path: PathBuf, message: String },
}

/// Indexing errors that abort a whole pass
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Invalid source path: {0}")]
    InvalidSource(PathBuf),

    #[error("Cannot list {path}: {source}")]
    ListFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid ignore pattern \"{pattern}\": {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Archive adapter errors
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Not a supported archive: {0}")]
    Unsupported(PathBuf),
}

/// Command-level errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Index error: {0}")]
    IndexError(#[from] IndexError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("user interrupted")]
    Interrupted,
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
