//! Storage error model.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type used across the storage layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-level error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An expected file was missing. Primitives do not auto-create files on
    /// read; provisioning is explicit.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The counter file did not hold a decimal integer.
    #[error("invalid counter value {content:?}")]
    Parse { content: String },

    /// Another cooperating process holds the advisory lock. Transient;
    /// callers decide whether and how to retry.
    #[error("ledger is locked by another process")]
    LockContention,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Map an open/read error for `path`, distinguishing a missing file.
    pub(crate) fn io_at(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }
}
