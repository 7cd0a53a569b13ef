//! Application-wide error types.
//!
//! Library modules use the [`Error`] enum via `thiserror`; the CLI layer
//! uses `anyhow` for convenient propagation.
//!
//! Only [`Error::InvalidDirectory`] is allowed to terminate a run, and only
//! before any scanning begins. Every per-file failure is captured at the
//! per-file processor boundary and recorded as accumulator state instead of
//! propagating: corrupt tags and failed duration probes move the file to the
//! corrupt list, a failed checksum leaves the track without a fingerprint,
//! and a failed tag write is logged and skipped.

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The scan root does not exist or is not a directory. Fatal, pre-scan.
    #[error("not a directory: {0}")]
    InvalidDirectory(PathBuf),

    /// A file could not be opened or statted. Per-file, recorded.
    #[error("cannot access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Tag data could not be read. Per-file, recorded; the file is excluded
    /// from the album index, the track list, and duplicate detection.
    #[error("unreadable tags in {0}")]
    MetadataCorrupt(PathBuf),

    /// The duration probe failed. Treated exactly like [`Error::MetadataCorrupt`].
    #[error("cannot probe duration of {0}")]
    ProbeFailure(PathBuf),

    /// Checksum streaming failed. The track is kept, its fingerprint is absent.
    #[error("checksum failed for {path}: {source}")]
    ChecksumFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A tag write-back failed (normalization or interactive fix).
    #[error("cannot write tags to {path}: {message}")]
    TagWrite { path: PathBuf, message: String },

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A worker task died (panic or runtime shutdown). Indicates a bug.
    #[error("worker task failed: {0}")]
    Worker(String),
}

impl Error {
    /// Create a file-access error.
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Create a checksum error.
    pub fn checksum(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ChecksumFailure {
            path: path.into(),
            source,
        }
    }

    /// Create a tag-write error.
    pub fn tag_write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::TagWrite {
            path: path.into(),
            message: message.into(),
        }
    }
}
