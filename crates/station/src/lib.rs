//! `labelforge-station`
//!
//! **Responsibility:** the workflow a label station runs per print job.
//!
//! This crate provides:
//! - input validation and sticker-sheet planning
//! - serial allocation for serialized labels
//! - rendering via external collaborators
//! - durable inventory recording (retry + overflow, every outcome surfaced)
//! - copy-by-copy print dispatch
//!
//! The station is a **thin shell** around the shared durable state in
//! `labelforge-store`; several stations may point at the same files.

pub mod status;
pub mod types;
pub mod workflow;

pub use status::{ConsoleStatus, StatusSink};
pub use types::{InventoryRequest, JobReceipt, PlainRequest};
pub use workflow::{PrintStation, StationError};
