//! Store errors.

use thiserror::Error;
use veneer_backend::BackendError;

/// Error returned by [`Store::write`](crate::Store::write).
///
/// `E` is the caller's own error type, raised from the transaction body and
/// propagated losslessly. An `Aborted` transaction has discarded every
/// staged change without touching the backend.
#[derive(Debug, Error)]
pub enum TransactionError<E> {
    /// The transaction body failed; all staged changes were rolled back.
    #[error("transaction aborted: {0}")]
    Aborted(E),

    /// The backend failed while dumping or applying changes.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl<E> TransactionError<E> {
    /// Returns the body's error if this is an `Aborted` transaction.
    pub fn into_aborted(self) -> Option<E> {
        match self {
            TransactionError::Aborted(e) => Some(e),
            TransactionError::Backend(_) => None,
        }
    }
}
