//! Error types for document operations.

use thiserror::Error;

use crate::element::ElementId;

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors that can occur when mutating a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Element not found in the document.
    #[error("Element not found: {0}")]
    NotFound(ElementId),

    /// Malformed mutation input; the document is left unchanged.
    #[error("Invalid mutation: {0}")]
    Validation(String),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Signal returned by undo/redo when the history cursor is at its boundary.
///
/// Not a fault: the caller keeps the current document and nothing changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("History boundary reached")]
pub struct AtBoundary;
