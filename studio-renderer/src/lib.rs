//! # `AdStudio` Renderer
//!
//! Export pipeline for `AdStudio` designs. A [`Document`](studio_core::Document)
//! is rendered to an SVG intermediate, rasterized with resvg/tiny-skia for
//! PNG and JPEG output, and embedded via printpdf for PDF output.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;

pub use error::{ExportError, ExportResult};
pub use export::{DesignExporter, ExportConfig};

/// Renderer crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
