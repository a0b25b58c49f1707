//! Backend boundary errors.

use thiserror::Error;

/// Errors surfaced by a [`Backend`](crate::Backend) implementation.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Underlying I/O failure (disk-backed or networked backends).
    #[error("backend I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend returned data the implementation could not read back.
    #[error("backend data corrupted: {0}")]
    Corrupted(String),

    /// The backend refused a mutation for a specific key.
    #[error("backend rejected mutation of {key:?}: {reason}")]
    Rejected {
        /// Key the mutation targeted.
        key: String,
        /// Backend-supplied reason.
        reason: String,
    },
}

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
