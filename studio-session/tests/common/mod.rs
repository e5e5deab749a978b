//! Shared fakes for session and coordinator tests.

// Each test binary uses a subset of these helpers
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::Instant;

use studio_core::{
    CanvasFormat, ComplianceReport, DesignId, Document, ExportFormat, Platform,
};
use studio_session::{
    ComplianceError, ComplianceService, DesignRenderer, DesignStore, RenderError, SaveStatus,
    StoreError,
};

/// Store fake that records every `put` with its timestamp.
#[derive(Clone, Default)]
pub struct RecordingStore {
    puts: Arc<Mutex<Vec<(Instant, Document)>>>,
    latency: Duration,
    fail: Arc<AtomicBool>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `put` sleeps this long before resolving.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make subsequent `put` calls fail until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn put_count(&self) -> usize {
        self.puts.lock().expect("lock").len()
    }

    pub fn puts(&self) -> Vec<(Instant, Document)> {
        self.puts.lock().expect("lock").clone()
    }
}

#[async_trait]
impl DesignStore for RecordingStore {
    async fn get(&self, id: &DesignId) -> Result<Document, StoreError> {
        Err(StoreError::NotFound(*id))
    }

    async fn put(&self, _id: &DesignId, document: &Document) -> Result<Document, StoreError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        self.puts
            .lock()
            .expect("lock")
            .push((Instant::now(), document.clone()));
        let mut accepted = document.clone();
        accepted.version = document.version + 1;
        Ok(accepted)
    }
}

/// Compliance fake with scripted per-call latency; each response carries the
/// call number in its score so tests can tell responses apart.
#[derive(Clone, Default)]
pub struct ScriptedCompliance {
    latencies: Arc<Mutex<VecDeque<Duration>>>,
    calls: Arc<AtomicU8>,
    fail: Arc<AtomicBool>,
}

impl ScriptedCompliance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_latency(&self, latency: Duration) {
        self.latencies.lock().expect("lock").push_back(latency);
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> u8 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ComplianceService for ScriptedCompliance {
    async fn check(
        &self,
        _id: &DesignId,
        _platform: Platform,
        _format: CanvasFormat,
    ) -> Result<ComplianceReport, ComplianceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let latency = self.latencies.lock().expect("lock").pop_front();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ComplianceError::Unavailable("injected failure".to_string()));
        }
        Ok(ComplianceReport {
            compliant: true,
            violations: Vec::new(),
            score: call,
        })
    }
}

/// Renderer fake that records the version of the document it rendered.
#[derive(Clone, Default)]
pub struct StubRenderer {
    rendered_versions: Arc<Mutex<Vec<u64>>>,
}

impl StubRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered_versions(&self) -> Vec<u64> {
        self.rendered_versions.lock().expect("lock").clone()
    }
}

#[async_trait]
impl DesignRenderer for StubRenderer {
    async fn render(
        &self,
        document: &Document,
        format: ExportFormat,
    ) -> Result<Vec<u8>, RenderError> {
        self.rendered_versions
            .lock()
            .expect("lock")
            .push(document.version);
        Ok(format!("{format}:{}", document.id).into_bytes())
    }
}

/// Block until the status watch reports the wanted value.
pub async fn wait_for_status(rx: &mut watch::Receiver<SaveStatus>, want: SaveStatus) {
    loop {
        if *rx.borrow_and_update() == want {
            return;
        }
        rx.changed().await.expect("status channel closed");
    }
}

/// Block until a compliance report is published (Some or None transition).
pub async fn wait_for_report_change(rx: &mut watch::Receiver<Option<ComplianceReport>>) {
    rx.changed().await.expect("report channel closed");
}
