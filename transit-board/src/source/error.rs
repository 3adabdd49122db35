//! Schedule source error types.

use std::path::PathBuf;

/// Errors that can occur when loading schedule snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Schedule file could not be read
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schedule file is not a JSON array of line records
    #[error("failed to parse {path:?}: {message}")]
    Json { path: PathBuf, message: String },

    /// Reload requested on a store that was not loaded from a file
    #[error("schedule store has no backing file")]
    NoBackingFile,
}
