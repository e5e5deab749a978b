//! Error types for export rendering.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while exporting a design.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The SVG intermediate could not be built or parsed.
    #[error("SVG error: {0}")]
    Svg(String),

    /// Encoding to the target format failed.
    #[error("Encoding error: {0}")]
    Encode(String),

    /// The document contains an element the exporter cannot represent.
    #[error("Unsupported element: {0}")]
    UnsupportedElement(String),
}
