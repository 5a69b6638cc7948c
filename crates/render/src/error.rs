//! Collaborator error model.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Failure of the external label renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch label creator: {0}")]
    Spawn(#[from] io::Error),

    /// The creator exited non-zero; its stderr (if any) is in the logs.
    #[error("label creator failed with status {status:?}")]
    Failed { status: Option<i32> },

    #[error("label creator did not finish within {timeout:?}")]
    Timeout { timeout: Duration },
}

/// Failure of the print spooler.
#[derive(Debug, Error)]
pub enum PrintError {
    #[error("failed to launch print spooler: {0}")]
    Spawn(#[from] io::Error),

    #[error("print spooler failed with status {status:?}")]
    Failed { status: Option<i32> },

    #[error("print spooler did not finish within {timeout:?}")]
    Timeout { timeout: Duration },
}
