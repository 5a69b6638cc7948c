//! `labelforge-store` — durable shared state for label stations.
//!
//! **Responsibility:** the files that several stations mutate together: the
//! serial counter, the append-only inventory ledger, and the overflow sink
//! for records that could not be committed.
//!
//! The storage primitives never retry internally. The ledger fails fast on
//! lock contention; bounded retry with a yielding delay is the
//! [`DurableAppender`]'s job.

pub mod appender;
pub mod counter;
pub mod error;
pub mod ledger;
pub mod overflow;

pub use appender::{
    AppendError, AppendEvent, AppendObserver, DurableAppender, NoopObserver, RecordLocation,
    RetryPolicy,
};
pub use counter::SerialCounter;
pub use error::{StoreError, StoreResult};
pub use ledger::Ledger;
pub use overflow::{DEFAULT_OVERFLOW_FILE, OverflowSink};
