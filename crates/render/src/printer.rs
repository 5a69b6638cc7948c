//! Print spooling seam.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::PrintError;

/// Spools one copy of a finished artifact to a named destination.
#[async_trait]
pub trait PrintDispatcher: Send + Sync {
    async fn dispatch(&self, artifact: &Path, destination: &str) -> Result<(), PrintError>;
}

/// Dispatcher backed by an `lp`-style spooler command, invoked as
/// `<program> -d <destination> <artifact>` once per copy.
#[derive(Debug, Clone)]
pub struct CommandPrinter {
    program: PathBuf,
    timeout: Duration,
}

impl CommandPrinter {
    pub const DEFAULT_PROGRAM: &'static str = "lp";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new() -> Self {
        Self::with_program(Self::DEFAULT_PROGRAM)
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl Default for CommandPrinter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrintDispatcher for CommandPrinter {
    async fn dispatch(&self, artifact: &Path, destination: &str) -> Result<(), PrintError> {
        tracing::debug!(
            artifact = %artifact.display(),
            destination,
            "dispatching to print spooler"
        );

        let status = tokio::time::timeout(
            self.timeout,
            Command::new(&self.program)
                .arg("-d")
                .arg(destination)
                .arg(artifact)
                .kill_on_drop(true)
                .status(),
        )
        .await
        .map_err(|_| PrintError::Timeout {
            timeout: self.timeout,
        })??;

        if !status.success() {
            return Err(PrintError::Failed {
                status: status.code(),
            });
        }
        Ok(())
    }
}
