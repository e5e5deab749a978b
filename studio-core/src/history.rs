//! Linear undo/redo history over document snapshots.
//!
//! Snapshots are full [`Document`] values; the document model is persistent,
//! so recording one is a cheap clone with no aliasing into live state.

use crate::document::Document;
use crate::error::AtBoundary;

/// Default maximum number of retained snapshots.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Append-only, truncate-on-branch undo/redo log of document snapshots.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    /// Snapshots, oldest first.
    entries: Vec<Document>,
    /// Index of the current snapshot.
    cursor: usize,
    /// Maximum retained snapshots; oldest entries drop beyond this.
    max_depth: usize,
}

impl HistoryStack {
    /// Create a history with a single entry holding the loaded document.
    #[must_use]
    pub fn new(initial: Document) -> Self {
        Self::with_depth(initial, DEFAULT_HISTORY_DEPTH)
    }

    /// Create a history with a custom maximum depth (at least 1).
    #[must_use]
    pub fn with_depth(initial: Document, max_depth: usize) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            max_depth: max_depth.max(1),
        }
    }

    /// Record a committed document snapshot.
    ///
    /// Truncates every entry past the cursor (an edit after undoing discards
    /// the redo branch), appends the snapshot, and advances the cursor to it.
    /// This is the only mutating entry point; call it exactly once per
    /// committed edit.
    pub fn record(&mut self, doc: Document) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(doc);
        self.cursor = self.entries.len() - 1;

        if self.entries.len() > self.max_depth {
            let excess = self.entries.len() - self.max_depth;
            self.entries.drain(..excess);
            self.cursor -= excess;
        }
    }

    /// Step the cursor back one snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AtBoundary`] without moving when there is nothing to undo.
    pub fn undo(&mut self) -> Result<&Document, AtBoundary> {
        if self.cursor == 0 {
            return Err(AtBoundary);
        }
        self.cursor -= 1;
        Ok(&self.entries[self.cursor])
    }

    /// Step the cursor forward one snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AtBoundary`] without moving when there is nothing to redo.
    pub fn redo(&mut self) -> Result<&Document, AtBoundary> {
        if self.cursor + 1 >= self.entries.len() {
            return Err(AtBoundary);
        }
        self.cursor += 1;
        Ok(&self.entries[self.cursor])
    }

    /// The snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> &Document {
        &self.entries[self.cursor]
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of retained snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the history holds at least the initial entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
