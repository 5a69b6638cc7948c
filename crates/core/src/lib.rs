//! `labelforge-core` — label domain building blocks.
//!
//! This crate contains **pure domain** primitives (no I/O concerns).

pub mod error;
pub mod label;
pub mod sheet;

pub use error::{DomainError, DomainResult};
pub use label::{LabelSpec, PlainLabel, serial_name};
pub use sheet::{SheetPlan, StickerKind};
