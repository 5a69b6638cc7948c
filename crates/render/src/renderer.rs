//! Label rendering seam.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::RenderError;

/// Inputs handed to a label creator.
///
/// For inventory labels the name already carries any serial suffix; serial
/// allocation happens before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderJob {
    Inventory {
        category: String,
        name: String,
        subtitle: String,
        description: String,
    },
    Plain {
        text: String,
    },
}

impl RenderJob {
    fn args(&self) -> Vec<&str> {
        match self {
            RenderJob::Inventory {
                category,
                name,
                subtitle,
                description,
            } => vec![category, name, subtitle, description],
            RenderJob::Plain { text } => vec![text],
        }
    }
}

/// Renders one label job into filesystem artifacts.
#[async_trait]
pub trait LabelRenderer: Send + Sync {
    /// Render the job and return the artifact paths the creator produced.
    async fn render(&self, job: &RenderJob) -> Result<Vec<PathBuf>, RenderError>;
}

/// Renderer backed by an external creator program.
///
/// The creator receives the job fields as arguments and prints the paths of
/// the artifacts it produced on stdout, one per line. Lines that do not name
/// an existing file are ignored.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: PathBuf,
    timeout: Duration,
}

impl CommandRenderer {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(program: impl Into<PathBuf>) -> Self {
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

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl LabelRenderer for CommandRenderer {
    async fn render(&self, job: &RenderJob) -> Result<Vec<PathBuf>, RenderError> {
        tracing::debug!(program = %self.program.display(), "invoking label creator");

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.program)
                .args(job.args())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| RenderError::Timeout {
            timeout: self.timeout,
        })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                status = ?output.status.code(),
                stderr = %stderr.trim(),
                "label creator failed"
            );
            return Err(RenderError::Failed {
                status: output.status.code(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut artifacts = Vec::new();
        for line in stdout.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let path = PathBuf::from(line);
            if path.is_file() {
                artifacts.push(path);
            }
        }

        tracing::debug!(count = artifacts.len(), "label creator reported artifacts");
        Ok(artifacts)
    }
}
