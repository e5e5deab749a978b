//! Error types for design sessions.

use thiserror::Error;

use studio_core::DocumentError;

use crate::services::{GenerateError, RenderError, StoreError};

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced by a design session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A mutation was rejected by the document model; nothing changed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The design store rejected or failed a call.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The renderer rejected or failed an export.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The generation service failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// The requested export format is not one of png/jpg/svg/pdf.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// A save is in flight and unresolved; close with discard to abandon it.
    #[error("A save is still in flight")]
    PendingSave,

    /// The session has been closed.
    #[error("Session is closed")]
    Closed,
}
