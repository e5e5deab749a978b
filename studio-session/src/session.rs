//! The design session: the façade an editor UI drives.
//!
//! A session exclusively owns one document. Every mutation funnels through
//! [`DesignSession::apply_edit`], which commits the new revision to history,
//! reconciles the selection, projects the result onto the canvas adapter,
//! and schedules sync - so history and sync can never observe a mutation
//! that bypassed recording.

use std::sync::Arc;

use tokio::sync::watch;

use studio_core::{
    AtBoundary, Background, ComplianceReport, DesignId, Document, DocumentResult, Element,
    ElementId, ElementPatch, ExportFormat, HistoryStack,
};

use crate::adapter::CanvasAdapter;
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::services::DesignRenderer;
use crate::sync::{SaveStatus, SyncCoordinator};

/// How a session should treat pending work when closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseMode {
    /// Write any unsaved revision before closing.
    Flush,
    /// Abandon pending timers and in-flight results.
    Discard,
}

/// An editing session over one design document.
pub struct DesignSession {
    document: Document,
    history: HistoryStack,
    selection: Vec<ElementId>,
    sync: SyncCoordinator,
    renderer: Arc<dyn DesignRenderer>,
    adapter: Box<dyn CanvasAdapter>,
    closed: bool,
}

impl DesignSession {
    /// Load a design from the store and start a session over it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] when the design cannot be fetched.
    pub async fn load(config: SessionConfig, id: DesignId) -> SessionResult<Self> {
        let document = config.store.get(&id).await?;
        tracing::info!(design = %id, version = document.version, "design loaded");
        Ok(Self::attach(config, document, true))
    }

    /// Start a session over a freshly created document (generated or blank)
    /// that the store has not seen yet. An initial save is scheduled.
    #[must_use]
    pub fn open(config: SessionConfig, document: Document) -> Self {
        tracing::info!(design = %document.id, "session opened on new design");
        Self::attach(config, document, false)
    }

    fn attach(config: SessionConfig, document: Document, synced: bool) -> Self {
        let sync = SyncCoordinator::start(config.sync, config.store, config.compliance);
        if synced {
            sync.reset(&document);
        } else {
            sync.schedule(&document);
        }
        let mut adapter = config.adapter;
        adapter.project(&document);
        Self {
            history: HistoryStack::with_depth(document.clone(), config.history_depth),
            document,
            selection: Vec::new(),
            sync,
            renderer: config.renderer,
            adapter,
            closed: false,
        }
    }

    /// The current committed document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The design being edited.
    #[must_use]
    pub fn design_id(&self) -> DesignId {
        self.document.id
    }

    /// Apply one logical edit through the single mutation choke point.
    ///
    /// The closure receives the current document and returns the next
    /// revision; on success the revision is recorded in history exactly once,
    /// the selection drops ids the edit removed, the canvas adapter receives
    /// the projection, and a save/check cycle is scheduled.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] after close, or the document model's
    /// rejection; the session state is unchanged on any error.
    pub fn apply_edit<F>(&mut self, edit: F) -> SessionResult<&Document>
    where
        F: FnOnce(&Document) -> DocumentResult<Document>,
    {
        self.ensure_open()?;
        let next = edit(&self.document)?;
        self.commit(next);
        Ok(&self.document)
    }

    /// Add an element on top of the stack.
    ///
    /// # Errors
    ///
    /// See [`Document::add_element`].
    pub fn add_element(&mut self, element: Element) -> SessionResult<ElementId> {
        let id = element.id;
        self.apply_edit(move |doc| doc.add_element(element))?;
        Ok(id)
    }

    /// Remove an element. If it was selected, the selection entry goes with
    /// it in the same step.
    ///
    /// # Errors
    ///
    /// See [`Document::remove_element`].
    pub fn remove_element(&mut self, id: ElementId) -> SessionResult<&Document> {
        self.apply_edit(move |doc| doc.remove_element(id))
    }

    /// Apply a partial update to an element.
    ///
    /// # Errors
    ///
    /// See [`Document::update_element`].
    pub fn update_element(
        &mut self,
        id: ElementId,
        patch: &ElementPatch,
    ) -> SessionResult<&Document> {
        self.apply_edit(move |doc| doc.update_element(id, patch))
    }

    /// Move an element to a new z-order index.
    ///
    /// # Errors
    ///
    /// See [`Document::reorder`].
    pub fn reorder(&mut self, id: ElementId, new_index: usize) -> SessionResult<&Document> {
        self.apply_edit(move |doc| doc.reorder(id, new_index))
    }

    /// Replace the canvas background.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] after close.
    pub fn set_background(&mut self, background: Background) -> SessionResult<&Document> {
        self.apply_edit(move |doc| Ok(doc.set_background(background)))
    }

    /// Step back one revision.
    ///
    /// Synchronous; an in-flight save never moves the cursor, and the
    /// restored revision becomes the newest state the next save carries.
    ///
    /// # Errors
    ///
    /// Signals [`AtBoundary`] (a no-op, not a fault) when there is nothing to
    /// undo or the session is closed.
    pub fn undo(&mut self) -> Result<&Document, AtBoundary> {
        if self.closed {
            return Err(AtBoundary);
        }
        let restored = self.history.undo()?.clone();
        self.restore(restored);
        Ok(&self.document)
    }

    /// Step forward one revision.
    ///
    /// # Errors
    ///
    /// Signals [`AtBoundary`] when there is nothing to redo or the session is
    /// closed.
    pub fn redo(&mut self) -> Result<&Document, AtBoundary> {
        if self.closed {
            return Err(AtBoundary);
        }
        let restored = self.history.redo()?.clone();
        self.restore(restored);
        Ok(&self.document)
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replace the selection.
    ///
    /// # Errors
    ///
    /// Rejects ids that do not exist in the current document.
    pub fn select(&mut self, ids: &[ElementId]) -> SessionResult<()> {
        self.ensure_open()?;
        for id in ids {
            if !self.document.contains(*id) {
                return Err(studio_core::DocumentError::NotFound(*id).into());
            }
        }
        self.selection = ids.to_vec();
        Ok(())
    }

    /// Currently selected element ids.
    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    /// Save immediately, bypassing the debounce window.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] after close or the store's failure.
    pub async fn save_now(&self) -> SessionResult<Document> {
        self.ensure_open()?;
        Ok(self.sync.save_now().await?)
    }

    /// Export the currently committed document.
    ///
    /// The export always reflects a recoverable history state, never an
    /// in-flight uncommitted edit.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnsupportedFormat`] for formats outside
    /// png/jpg/svg/pdf, [`SessionError::Render`] when rendering fails.
    pub async fn export_as(&self, format: &str) -> SessionResult<Vec<u8>> {
        self.ensure_open()?;
        let format: ExportFormat = format
            .parse()
            .map_err(|_| SessionError::UnsupportedFormat(format.to_string()))?;
        Ok(self.renderer.render(&self.document, format).await?)
    }

    /// Current save status.
    #[must_use]
    pub fn save_status(&self) -> SaveStatus {
        self.sync.status()
    }

    /// Watch save status transitions.
    #[must_use]
    pub fn status_watch(&self) -> watch::Receiver<SaveStatus> {
        self.sync.status_watch()
    }

    /// Latest compliance report, if any check has completed.
    #[must_use]
    pub fn compliance_report(&self) -> Option<ComplianceReport> {
        self.sync.latest_report()
    }

    /// Watch compliance report updates.
    #[must_use]
    pub fn report_watch(&self) -> watch::Receiver<Option<ComplianceReport>> {
        self.sync.report_watch()
    }

    /// Whether the session holds changes the store has not acknowledged.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.sync.is_dirty()
    }

    /// Close the session.
    ///
    /// With [`CloseMode::Flush`], an unresolved in-flight save fails with
    /// [`SessionError::PendingSave`] and any unsaved revision is written
    /// before the timers stop - a pending revision is never silently lost.
    /// With [`CloseMode::Discard`], timers are canceled immediately and
    /// in-flight results are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::PendingSave`] or the final save's failure.
    pub async fn close(&mut self, mode: CloseMode) -> SessionResult<()> {
        if self.closed {
            return Ok(());
        }
        if mode == CloseMode::Flush {
            if self.sync.is_saving() {
                return Err(SessionError::PendingSave);
            }
            if self.sync.is_dirty() {
                self.sync.save_now().await?;
            }
        }
        self.sync.shutdown();
        self.closed = true;
        tracing::info!(design = %self.document.id, "session closed");
        Ok(())
    }

    /// Whether the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> SessionResult<()> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        Ok(())
    }

    /// Commit a newly edited revision: record, reconcile, project, schedule.
    fn commit(&mut self, next: Document) {
        self.document = next;
        self.history.record(self.document.clone());
        self.reconcile_selection();
        self.adapter.project(&self.document);
        self.sync.schedule(&self.document);
    }

    /// Make a history snapshot current without recording a new entry.
    fn restore(&mut self, snapshot: Document) {
        self.document = snapshot;
        self.reconcile_selection();
        self.adapter.project(&self.document);
        self.sync.schedule(&self.document);
    }

    /// Drop selection entries whose elements no longer exist.
    fn reconcile_selection(&mut self) {
        let document = &self.document;
        self.selection.retain(|id| document.contains(*id));
    }
}

impl std::fmt::Debug for DesignSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignSession")
            .field("design", &self.document.id)
            .field("version", &self.document.version)
            .field("history_len", &self.history.len())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
