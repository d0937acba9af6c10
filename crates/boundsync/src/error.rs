use boundsync_ids::NativeHandle;
use thiserror::Error;

/// Errors surfaced by native window collaborators.
///
/// The tracker itself never fails: it logs these and carries on, relying on
/// the next live geometry read to heal any divergence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A native window operation failed.
    #[error("native {op} failed: {message}")]
    Native {
        /// Operation name (e.g. "set_bounds").
        op: &'static str,
        /// Host-provided failure description.
        message: String,
    },

    /// A native handle could not be mapped to a known window.
    #[error("unknown native handle {0}")]
    UnknownHandle(NativeHandle),

    /// A batched position transaction could not be committed.
    #[error("window position transaction failed: {0}")]
    Transaction(String),
}

impl Error {
    /// Helper to build a native operation error.
    pub fn native<M: Into<String>>(op: &'static str, message: M) -> Self {
        Self::Native {
            op,
            message: message.into(),
        }
    }
}

/// Result alias for collaborator operations.
pub type Result<T> = std::result::Result<T, Error>;
