//! Error types for the snapshot viewer.

use std::path::PathBuf;

/// Errors that can occur while loading or rendering a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// No snapshot path was given on the command line.
    #[error("usage: houstonv <snapshot.json | ->")]
    Usage,

    /// The snapshot file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot text is not a valid timeline record.
    #[error("invalid snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}
