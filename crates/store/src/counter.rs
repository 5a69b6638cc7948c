//! Serial-number allocation backed by a single file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};

/// File-backed serial counter.
///
/// The file holds the last-issued serial as its sole content (decimal,
/// nothing else). Every operation re-reads from disk; there is no in-memory
/// state to go stale across processes.
///
/// There is **no locking** here. The read and the write in [`increment`] are
/// two separate file operations, so callers must serialize access themselves
/// or accept that interleaved increments can lose an update (duplicate or
/// skipped serials). This is a known limitation, not something this type
/// papers over.
///
/// [`increment`]: SerialCounter::increment
#[derive(Debug, Clone)]
pub struct SerialCounter {
    path: PathBuf,
}

impl SerialCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the last-issued serial.
    ///
    /// Fails with [`StoreError::NotFound`] if the counter file does not
    /// exist (provisioning is explicit, see [`seed`]) and
    /// [`StoreError::Parse`] if its first line is not a decimal integer.
    ///
    /// [`seed`]: SerialCounter::seed
    pub fn get(&self) -> StoreResult<u64> {
        let raw = fs::read_to_string(&self.path).map_err(|e| StoreError::io_at(&self.path, e))?;
        let line = raw.lines().next().unwrap_or("").trim();
        line.parse::<u64>().map_err(|_| StoreError::Parse {
            content: line.to_string(),
        })
    }

    /// Issue the next serial: read, add one, overwrite, return the new value.
    pub fn increment(&self) -> StoreResult<u64> {
        let next = self.get()? + 1;
        fs::write(&self.path, next.to_string())?;
        Ok(next)
    }

    /// Provision the counter file with an initial value (overwrites).
    pub fn seed(&self, value: u64) -> StoreResult<()> {
        fs::write(&self.path, value.to_string())?;
        Ok(())
    }
}
