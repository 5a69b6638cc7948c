//! `labelforge-render` — rendering and printing collaborators.
//!
//! The station treats label rendering and print spooling as opaque external
//! services: hand over structured inputs, get back artifact paths or a
//! failure. This crate defines those seams and ships subprocess-backed
//! implementations; what happens inside the creator program (page layout,
//! QR codes, fonts) is none of our business.

pub mod error;
pub mod printer;
pub mod renderer;

pub use error::{PrintError, RenderError};
pub use printer::{CommandPrinter, PrintDispatcher};
pub use renderer::{CommandRenderer, LabelRenderer, RenderJob};
