//! Last-resort sink for records that could not be committed.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StoreResult;

/// Well-known overflow file name in the station's working directory.
pub const DEFAULT_OVERFLOW_FILE: &str = "lost-inventory.txt";

/// Append-only secondary file, same line-record shape as the ledger.
///
/// No locking: this is the path of last resort and contention here is not
/// retried. Nothing in this subsystem reads it back — recovery is a manual
/// operator task.
#[derive(Debug, Clone)]
pub struct OverflowSink {
    path: PathBuf,
}

impl OverflowSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sink under the well-known name inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(DEFAULT_OVERFLOW_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single line, creating the file if needed.
    pub fn append(&self, record: &str) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.write_all(record.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        Ok(())
    }
}
