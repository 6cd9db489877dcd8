//! Error types for chanstat.
//!
//! Resolution inside the aggregate graph never fails: unknown networks,
//! channels and users are created on first sight. The only fallible
//! operations are loading and saving the snapshot.

use thiserror::Error;

/// Snapshot persistence errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// The snapshot decoded but its tables do not form a consistent graph.
    #[error("snapshot integrity error: {0}")]
    Integrity(String),
}

impl SnapshotError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Encode(_) => "encode",
            Self::Decode(_) => "decode",
            Self::Integrity(_) => "integrity",
        }
    }

    /// Whether this error means the snapshot on disk is unusable, as
    /// opposed to a transient I/O problem.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Integrity(_))
    }
}
