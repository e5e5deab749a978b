//! Canvas surface seam.
//!
//! The adapter receives a one-way projection of the current document after
//! every committed change. It must never mutate the document directly; all
//! mutations flow through the session's edit entry point.

use studio_core::Document;

/// Read-only view of the session's document for an interactive surface.
pub trait CanvasAdapter: Send {
    /// Project a newly committed document onto the surface.
    fn project(&mut self, document: &Document);
}

/// Adapter that discards projections; useful for headless sessions and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAdapter;

impl CanvasAdapter for NullAdapter {
    fn project(&mut self, _document: &Document) {}
}
