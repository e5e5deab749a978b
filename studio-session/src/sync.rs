//! Debounced save and compliance synchronization.
//!
//! The coordinator decouples rapid local edits from network calls. Every
//! committed edit restarts two independent debounce timers; when a timer
//! fires, the worker reads the latest document snapshot, so a burst of edits
//! collapses into exactly one save and one compliance check after the user
//! pauses. Saves are mutually exclusive: a second request queues behind an
//! in-flight `put`, and edits that land during the flight produce exactly one
//! follow-up carrying the newest state. Compliance checks may race; stale
//! responses are discarded by sequence number.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};

use studio_core::{CanvasFormat, ComplianceReport, Document, Platform};

use crate::config::SyncConfig;
use crate::services::{ComplianceService, DesignStore, StoreError};

/// Save lifecycle state exposed to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    /// Local changes not yet written to the store.
    Unsaved,
    /// A `put` is in flight.
    Saving,
    /// The store holds the latest committed state.
    Saved,
    /// The last save failed; the document remains unsaved for retry.
    Error,
}

/// Signals driving the save worker.
enum SaveSignal {
    /// A committed edit; restarts the debounce window.
    Edited,
    /// Explicit user save; bypasses the debounce window.
    Manual(oneshot::Sender<Result<Document, StoreError>>),
    /// Session is closing; stop without a final save.
    Shutdown,
}

/// State shared between the coordinator handle and its workers.
struct Shared {
    /// Latest committed document snapshot.
    latest: Mutex<Option<Document>>,
    /// Copy of the last document the store acknowledged.
    last_stored: Mutex<Option<Document>>,
    /// Bumped once per committed edit.
    dirty_gen: AtomicU64,
    /// Generation the store last acknowledged.
    saved_gen: AtomicU64,
    /// Sequence number of the most recently dispatched compliance check.
    check_seq: AtomicU64,
    /// Whether a `put` is currently in flight.
    in_flight: AtomicBool,
    /// Set on shutdown; late results are discarded.
    closed: AtomicBool,
    status_tx: watch::Sender<SaveStatus>,
    report_tx: watch::Sender<Option<ComplianceReport>>,
}

impl Shared {
    fn set_status(&self, status: SaveStatus) {
        if !self.closed.load(Ordering::SeqCst) {
            let _ = self.status_tx.send(status);
        }
    }

    fn latest_snapshot(&self) -> Option<Document> {
        self.latest
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn is_dirty(&self) -> bool {
        self.dirty_gen.load(Ordering::SeqCst) != self.saved_gen.load(Ordering::SeqCst)
    }
}

/// Debounced dispatcher for saves and compliance checks.
pub struct SyncCoordinator {
    shared: Arc<Shared>,
    save_tx: mpsc::UnboundedSender<SaveSignal>,
    check_tx: Option<mpsc::UnboundedSender<()>>,
    status_rx: watch::Receiver<SaveStatus>,
    report_rx: watch::Receiver<Option<ComplianceReport>>,
}

impl SyncCoordinator {
    /// Spawn the save and compliance workers.
    ///
    /// Must be called within a tokio runtime.
    #[must_use]
    pub fn start(
        config: SyncConfig,
        store: Arc<dyn DesignStore>,
        compliance: Arc<dyn ComplianceService>,
    ) -> Self {
        let (status_tx, status_rx) = watch::channel(SaveStatus::Saved);
        let (report_tx, report_rx) = watch::channel(None);
        let shared = Arc::new(Shared {
            latest: Mutex::new(None),
            last_stored: Mutex::new(None),
            dirty_gen: AtomicU64::new(0),
            saved_gen: AtomicU64::new(0),
            check_seq: AtomicU64::new(0),
            in_flight: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            status_tx,
            report_tx,
        });

        let (save_tx, save_rx) = mpsc::unbounded_channel();
        let (check_tx, check_rx) = mpsc::unbounded_channel();

        tokio::spawn(save_worker(
            Arc::clone(&shared),
            store,
            config.save_debounce,
            save_rx,
        ));
        tokio::spawn(check_worker(
            Arc::clone(&shared),
            compliance,
            config.check_debounce,
            config.platform,
            config.format,
            check_rx,
        ));

        Self {
            shared,
            save_tx,
            check_tx: Some(check_tx),
            status_rx,
            report_rx,
        }
    }

    /// Seed the coordinator with a freshly loaded document.
    ///
    /// The document counts as saved; no timers start.
    pub fn reset(&self, document: &Document) {
        {
            let mut latest = self
                .shared
                .latest
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            *latest = Some(document.clone());
        }
        let gen = self.shared.dirty_gen.load(Ordering::SeqCst);
        self.shared.saved_gen.store(gen, Ordering::SeqCst);
        self.shared.set_status(SaveStatus::Saved);
        let _ = self.shared.report_tx.send(None);
    }

    /// Register a committed edit: restart both debounce timers with the new
    /// snapshot and flag the document unsaved.
    pub fn schedule(&self, document: &Document) {
        {
            let mut latest = self
                .shared
                .latest
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            *latest = Some(document.clone());
        }
        self.shared.dirty_gen.fetch_add(1, Ordering::SeqCst);
        self.shared.set_status(SaveStatus::Unsaved);
        let _ = self.save_tx.send(SaveSignal::Edited);
        if let Some(check_tx) = &self.check_tx {
            let _ = check_tx.send(());
        }
    }

    /// Save immediately, bypassing the debounce window.
    ///
    /// Cancels any pending scheduled save and serializes behind an in-flight
    /// one. A clean document is not re-sent; the last acknowledged copy is
    /// returned instead.
    ///
    /// # Errors
    ///
    /// Returns the store's error when the `put` fails, or
    /// [`StoreError::Unavailable`] if the coordinator has shut down.
    pub async fn save_now(&self) -> Result<Document, StoreError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.save_tx
            .send(SaveSignal::Manual(ack_tx))
            .map_err(|_| StoreError::Unavailable("sync worker stopped".to_string()))?;
        ack_rx
            .await
            .map_err(|_| StoreError::Unavailable("sync worker stopped".to_string()))?
    }

    /// Current save status.
    #[must_use]
    pub fn status(&self) -> SaveStatus {
        *self.status_rx.borrow()
    }

    /// Watch save status transitions.
    #[must_use]
    pub fn status_watch(&self) -> watch::Receiver<SaveStatus> {
        self.status_rx.clone()
    }

    /// Latest compliance report, if one is available.
    #[must_use]
    pub fn latest_report(&self) -> Option<ComplianceReport> {
        self.report_rx.borrow().clone()
    }

    /// Watch compliance report updates.
    #[must_use]
    pub fn report_watch(&self) -> watch::Receiver<Option<ComplianceReport>> {
        self.report_rx.clone()
    }

    /// Whether a `put` is currently in flight.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.shared.in_flight.load(Ordering::SeqCst)
    }

    /// Whether local changes have not yet been acknowledged by the store.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.shared.is_dirty()
    }

    /// Cancel pending timers and stop both workers.
    ///
    /// In-flight network calls are allowed to complete; their results are
    /// discarded.
    pub fn shutdown(&mut self) {
        self.shared.closed.store(true, Ordering::SeqCst);
        let _ = self.save_tx.send(SaveSignal::Shutdown);
        // Dropping the sender ends the compliance worker
        self.check_tx.take();
    }
}

/// Outcome of waiting out a debounce window.
enum WindowOutcome {
    /// The quiet period elapsed.
    Fired,
    /// An explicit save interrupted the window.
    Manual(oneshot::Sender<Result<Document, StoreError>>),
    /// The coordinator is shutting down.
    Shutdown,
}

/// Wait for the quiet period, restarting on every further edit signal.
async fn debounce_window(
    rx: &mut mpsc::UnboundedReceiver<SaveSignal>,
    window: std::time::Duration,
) -> WindowOutcome {
    loop {
        tokio::select! {
            () = tokio::time::sleep(window) => return WindowOutcome::Fired,
            next = rx.recv() => match next {
                Some(SaveSignal::Edited) => {}
                Some(SaveSignal::Manual(ack)) => return WindowOutcome::Manual(ack),
                Some(SaveSignal::Shutdown) | None => return WindowOutcome::Shutdown,
            },
        }
    }
}

/// Save worker: debounce, dispatch, coalesce.
async fn save_worker(
    shared: Arc<Shared>,
    store: Arc<dyn DesignStore>,
    window: std::time::Duration,
    mut rx: mpsc::UnboundedReceiver<SaveSignal>,
) {
    while let Some(signal) = rx.recv().await {
        let mut manual_ack = match signal {
            SaveSignal::Edited => match debounce_window(&mut rx, window).await {
                WindowOutcome::Fired => None,
                WindowOutcome::Manual(ack) => Some(ack),
                WindowOutcome::Shutdown => return,
            },
            SaveSignal::Manual(ack) => Some(ack),
            SaveSignal::Shutdown => return,
        };

        if !shared.is_dirty() {
            // Nothing new since the last acknowledged save. A stale Edited
            // signal is dropped; an explicit save answers with the last
            // acknowledged copy instead of re-sending a clean document.
            if let Some(ack) = manual_ack.take() {
                let last = shared
                    .last_stored
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .clone();
                let reply = match last.or_else(|| shared.latest_snapshot()) {
                    Some(doc) => Ok(doc),
                    None => Err(StoreError::Unavailable("no document loaded".to_string())),
                };
                let _ = ack.send(reply);
            }
            continue;
        }

        run_save(&shared, store.as_ref(), manual_ack).await;
    }
}

/// Perform one save, then exactly one follow-up per in-flight edit burst
/// until the acknowledged generation catches up with the dirty generation.
async fn run_save(
    shared: &Shared,
    store: &dyn DesignStore,
    mut manual_ack: Option<oneshot::Sender<Result<Document, StoreError>>>,
) {
    loop {
        if shared.closed.load(Ordering::SeqCst) {
            return;
        }
        let gen = shared.dirty_gen.load(Ordering::SeqCst);
        let Some(document) = shared.latest_snapshot() else {
            if let Some(ack) = manual_ack.take() {
                let _ = ack.send(Err(StoreError::Unavailable(
                    "no document loaded".to_string(),
                )));
            }
            return;
        };

        shared.set_status(SaveStatus::Saving);
        shared.in_flight.store(true, Ordering::SeqCst);
        let result = store.put(&document.id, &document).await;
        shared.in_flight.store(false, Ordering::SeqCst);

        match result {
            Ok(stored) => {
                shared.saved_gen.store(gen, Ordering::SeqCst);
                {
                    let mut last = shared
                        .last_stored
                        .lock()
                        .unwrap_or_else(std::sync::PoisonError::into_inner);
                    *last = Some(stored.clone());
                }
                tracing::debug!(design = %document.id, version = stored.version, "design saved");
                if let Some(ack) = manual_ack.take() {
                    let _ = ack.send(Ok(stored));
                }
                if shared.dirty_gen.load(Ordering::SeqCst) != gen {
                    // Edited during the flight: one follow-up with the latest
                    continue;
                }
                shared.set_status(SaveStatus::Saved);
                return;
            }
            Err(err) => {
                tracing::warn!(design = %document.id, error = %err, "save failed; document remains unsaved");
                shared.set_status(SaveStatus::Error);
                if let Some(ack) = manual_ack.take() {
                    let _ = ack.send(Err(err));
                }
                return;
            }
        }
    }
}

/// Compliance worker: debounce, dispatch without mutual exclusion, discard
/// stale responses by sequence number.
async fn check_worker(
    shared: Arc<Shared>,
    service: Arc<dyn ComplianceService>,
    window: std::time::Duration,
    platform: Platform,
    format: CanvasFormat,
    mut rx: mpsc::UnboundedReceiver<()>,
) {
    while rx.recv().await.is_some() {
        loop {
            tokio::select! {
                () = tokio::time::sleep(window) => break,
                next = rx.recv() => if next.is_none() { return },
            }
        }

        let Some(document) = shared.latest_snapshot() else {
            continue;
        };
        let seq = shared.check_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let task_shared = Arc::clone(&shared);
        let task_service = Arc::clone(&service);
        tokio::spawn(async move {
            dispatch_check(
                &task_shared,
                task_service.as_ref(),
                document,
                platform,
                format,
                seq,
            )
            .await;
        });
    }
}

/// Run one compliance check; only the newest dispatched request may publish.
async fn dispatch_check(
    shared: &Shared,
    service: &dyn ComplianceService,
    document: Document,
    platform: Platform,
    format: CanvasFormat,
    seq: u64,
) {
    let current = |shared: &Shared| {
        shared.check_seq.load(Ordering::SeqCst) == seq && !shared.closed.load(Ordering::SeqCst)
    };
    match service.check(&document.id, platform, format).await {
        Ok(report) => {
            if current(shared) {
                tracing::debug!(design = %document.id, score = report.score, "compliance updated");
                let _ = shared.report_tx.send(Some(report));
            } else {
                tracing::debug!(design = %document.id, seq, "stale compliance response discarded");
            }
        }
        Err(err) => {
            // Advisory only: swallow the failure and clear the result
            tracing::warn!(design = %document.id, error = %err, "compliance check failed; no result available");
            if current(shared) {
                let _ = shared.report_tx.send(None);
            }
        }
    }
}
