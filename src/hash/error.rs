// Centralized error handling module
// Error types with path/operation context for walking and hashing

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tree hashing
#[derive(Debug, Error)]
pub enum HashWalkError {
    /// File system errors with context
    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Directory not found: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied while {operation} {}", .path.display())]
    PermissionDenied { path: PathBuf, operation: String },

    #[error("I/O error while {operation}{}: {source}", fmt_path(.path))]
    IoError {
        path: Option<PathBuf>,
        operation: String,
        #[source]
        source: io::Error,
    },

    /// Symlink could not be read or its target could not be stat'ed
    #[error("error reading symlink {}: {source}", .path.display())]
    SymlinkResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration errors, fatal before the walk starts
    #[error("invalid exclude pattern: {source}")]
    InvalidExcludePattern {
        #[source]
        source: regex::Error,
    },

    /// The worker pool could not be started
    #[error("unable to start worker pool: {source}")]
    WorkerPool {
        #[source]
        source: rayon::ThreadPoolBuildError,
    },

    /// A worker thread died before reporting a result
    #[error("worker panicked while hashing: {message}")]
    WorkerPanicked { message: String },
}

fn fmt_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" {}", p.display()),
        None => String::new(),
    }
}

impl HashWalkError {
    /// Create an error with context about the operation and optional path,
    /// picking a more specific variant for NotFound and PermissionDenied.
    pub fn from_io_error(err: io::Error, operation: &str, path: Option<PathBuf>) -> Self {
        match (err.kind(), path) {
            (io::ErrorKind::NotFound, Some(p)) => {
                if operation.contains("directory") {
                    HashWalkError::DirectoryNotFound { path: p }
                } else {
                    HashWalkError::FileNotFound { path: p }
                }
            }
            (io::ErrorKind::PermissionDenied, Some(p)) => HashWalkError::PermissionDenied {
                path: p,
                operation: operation.to_string(),
            },
            (_, path) => HashWalkError::IoError {
                path,
                operation: operation.to_string(),
                source: err,
            },
        }
    }

    /// True for errors raised while reading file contents
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            HashWalkError::FileNotFound { .. }
                | HashWalkError::DirectoryNotFound { .. }
                | HashWalkError::PermissionDenied { .. }
                | HashWalkError::IoError { .. }
        )
    }
}

impl From<io::Error> for HashWalkError {
    fn from(err: io::Error) -> Self {
        HashWalkError::from_io_error(err, "unknown operation", None)
    }
}

pub type Result<T> = std::result::Result<T, HashWalkError>;
