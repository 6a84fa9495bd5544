//! Error types for scanning and sorting.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias using the media sort error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scanning or sorting a folder.
#[derive(Debug, Error)]
pub enum Error {
    /// Scan target or sort root does not exist or is not a directory.
    #[error("Folder does not exist or is not a directory: {}", .0.display())]
    NotFound(PathBuf),

    /// Permission denied while reading a directory.
    #[error("Permission denied: {}", path.display())]
    Access {
        /// Path that could not be accessed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Other IO failure while reading a directory.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Path where the error occurred.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Destination folder could not be created.
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        /// Destination folder.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// File could not be moved to its destination folder.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    Move {
        /// Current file path.
        from: PathBuf,
        /// Target file path.
        to: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Native title cleaner could not be loaded.
    #[error("Native title cleaner unavailable: {0}")]
    AccelerationUnavailable(String),

    /// Sort was started without a root folder.
    #[error("Root folder is not set")]
    RootNotSet,

    /// Sort was started while another sort is running on the same engine.
    #[error("A sort is already in progress")]
    SortInProgress,
}

impl Error {
    /// Map a directory read error to `NotFound`, `Access` or `Io`.
    pub(crate) fn from_read_dir(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::Access {
                path: path.to_path_buf(),
                source: error,
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
