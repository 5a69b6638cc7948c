//! Bounded retry-with-fallback protocol for ledger appends.
//!
//! Generalized out of the station print flow so any caller gets the same
//! guarantee: a record ends up in the ledger, or in the overflow sink with
//! an explicit failure, or the caller is told synchronously that it may be
//! lost. Nothing is dropped silently.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::error::StoreError;
use crate::ledger::Ledger;
use crate::overflow::OverflowSink;

/// Fixed-delay retry policy for contended appends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_millis(200),
        }
    }
}

/// Progress and terminal notifications emitted while committing one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppendEvent {
    /// The ledger lock was held elsewhere on this try (`attempt` is 1-based).
    Contended { attempt: u32, max_attempts: u32 },
    /// The record is durably in the ledger.
    Committed,
    /// Retries exhausted; the record was diverted to the overflow sink.
    Overflowed { attempts: u32 },
    /// Neither the ledger nor the overflow sink accepted the record.
    Lost,
}

/// Receives append notifications.
///
/// Every attempt and every terminal outcome is delivered here, so the
/// surface driving the station (status line, log pane) can show all of them.
pub trait AppendObserver: Send + Sync {
    fn notify(&self, event: AppendEvent);
}

/// Observer that discards all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AppendObserver for NoopObserver {
    fn notify(&self, _event: AppendEvent) {}
}

/// Where a record ended up, as far as this subsystem knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordLocation {
    Ledger,
    Overflow,
}

/// Terminal failure of a durable append.
#[derive(Debug, Error)]
pub enum AppendError {
    /// Non-contention ledger failure; nothing was written anywhere and no
    /// fallback was attempted.
    #[error("ledger append failed: {0}")]
    Ledger(#[source] StoreError),

    /// The record is durably in the overflow sink, not the ledger. The
    /// primary operation still failed.
    #[error("record diverted to overflow sink after {attempts} contended attempts")]
    Overflowed { attempts: u32 },

    /// Both the ledger and the overflow sink refused the record; it may be
    /// lost and the operator must be told.
    #[error("record could not be written to the ledger or the overflow sink")]
    Lost(#[source] StoreError),
}

impl AppendError {
    /// Last known durable location of the record, if it has one.
    pub fn location(&self) -> Option<RecordLocation> {
        match self {
            AppendError::Overflowed { .. } => Some(RecordLocation::Overflow),
            AppendError::Ledger(_) | AppendError::Lost(_) => None,
        }
    }
}

/// Retry-and-fallback appender over a ledger and an overflow sink.
///
/// Handles are explicit: one appender per (ledger, overflow) pair, passed to
/// whoever needs it, never ambient files opened ad hoc.
#[derive(Debug, Clone)]
pub struct DurableAppender {
    ledger: Ledger,
    overflow: OverflowSink,
    policy: RetryPolicy,
}

impl DurableAppender {
    pub fn new(ledger: Ledger, overflow: OverflowSink) -> Self {
        Self::with_policy(ledger, overflow, RetryPolicy::default())
    }

    pub fn with_policy(ledger: Ledger, overflow: OverflowSink, policy: RetryPolicy) -> Self {
        Self {
            ledger,
            overflow,
            policy,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn overflow(&self) -> &OverflowSink {
        &self.overflow
    }

    /// Commit one record durably.
    ///
    /// Tries the ledger up to `max_attempts` times, notifying the observer
    /// on every contended try and yielding between tries with
    /// `tokio::time::sleep` so independent work in the caller's runtime
    /// keeps running. Non-contention errors abort immediately without
    /// touching the overflow sink. When retries are exhausted the record
    /// goes to the overflow sink and the commit still reports failure.
    pub async fn commit(
        &self,
        record: &str,
        observer: &dyn AppendObserver,
    ) -> Result<(), AppendError> {
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.ledger.append(record) {
                Ok(()) => {
                    tracing::debug!(attempt, "record committed to ledger");
                    observer.notify(AppendEvent::Committed);
                    return Ok(());
                }
                Err(StoreError::LockContention) => {
                    tracing::debug!(attempt, max_attempts, "ledger lock contended");
                    observer.notify(AppendEvent::Contended {
                        attempt,
                        max_attempts,
                    });
                    if attempt < max_attempts {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
                Err(err) => return Err(AppendError::Ledger(err)),
            }
        }

        match self.overflow.append(record) {
            Ok(()) => {
                tracing::warn!(
                    record,
                    sink = %self.overflow.path().display(),
                    "record diverted to overflow sink"
                );
                observer.notify(AppendEvent::Overflowed {
                    attempts: max_attempts,
                });
                Err(AppendError::Overflowed {
                    attempts: max_attempts,
                })
            }
            Err(err) => {
                tracing::error!(
                    record,
                    error = %err,
                    "record may be LOST: overflow sink write failed"
                );
                observer.notify(AppendEvent::Lost);
                Err(AppendError::Lost(err))
            }
        }
    }
}
