//! loom-codegen: deterministic React source generation from a layout plan.
//!
//! The generator does not make design decisions. It transcribes a
//! validated [`loom_core::LayoutPlan`] into a single `GeneratedUI`
//! component that imports only from the fixed component library, then
//! scans its own output with [`validate_code()`].

mod error;
mod generate;
mod templates;
mod validate;

pub use error::CodegenError;
pub use generate::{generate, GeneratedCode};
pub use templates::{EXPORT_MARKER, LIBRARY_IMPORT_SOURCE, UNIT_NAME};
pub use validate::validate_code;
