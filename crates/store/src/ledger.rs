//! Append-only inventory ledger with process-level mutual exclusion.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{StoreError, StoreResult};

/// Advisory-locked, line-oriented record store shared between processes.
///
/// Every operation opens the file fresh and takes an exclusive,
/// **non-blocking** advisory lock on the handle — readers included, so a
/// concurrent append and read cannot interleave mid-line. When the lock is
/// held elsewhere the operation fails immediately with
/// [`StoreError::LockContention`] instead of stalling; bounded retry belongs
/// to the caller (see [`DurableAppender`]).
///
/// Records are opaque caller-supplied lines. Once appended they are never
/// modified or removed here; on-disk order is lock-acquisition order, which
/// under contention may differ from request-issue order (no fairness
/// guarantee). The lock only excludes cooperating processes that also take
/// it — it is advisory, not mandatory.
///
/// [`DurableAppender`]: crate::appender::DurableAppender
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

/// Holds the advisory lock for a scope; releases it on every exit path.
struct LockGuard {
    file: File,
}

impl LockGuard {
    fn acquire(file: File) -> StoreResult<Self> {
        if let Err(err) = file.try_lock_exclusive() {
            if err.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                return Err(StoreError::LockContention);
            }
            return Err(StoreError::Io(err));
        }
        Ok(Self { file })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single line.
    ///
    /// Creates the ledger file if it does not exist yet. The lock is held
    /// for the duration of the write and released before the handle closes.
    pub fn append(&self, record: &str) -> StoreResult<()> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut guard = LockGuard::acquire(file)?;

        guard.file.write_all(record.as_bytes())?;
        guard.file.write_all(b"\n")?;
        guard.file.flush()?;
        Ok(())
    }

    /// Number of records currently on disk.
    pub fn count(&self) -> StoreResult<usize> {
        Ok(self.snapshot()?.len())
    }

    /// All records in file order, trimmed, blank lines dropped.
    ///
    /// The returned sequence is a snapshot: appends that win the lock after
    /// this call returns are not reflected.
    pub fn contents(&self) -> StoreResult<Vec<String>> {
        self.snapshot()
    }

    fn snapshot(&self) -> StoreResult<Vec<String>> {
        let file = File::open(&self.path).map_err(|e| StoreError::io_at(&self.path, e))?;
        let guard = LockGuard::acquire(file)?;

        let mut records = Vec::new();
        for line in BufReader::new(&guard.file).lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                records.push(line.to_string());
            }
        }
        Ok(records)
    }
}
