//! Session and sync configuration.
//!
//! Configuration is an explicit value handed to the session at construction;
//! nothing here reads process-wide state, so tests inject fakes freely.

use std::sync::Arc;
use std::time::Duration;

use studio_core::{CanvasFormat, Platform};

use crate::adapter::{CanvasAdapter, NullAdapter};
use crate::services::{ComplianceService, DesignRenderer, DesignStore};

/// Default quiet period before a scheduled save fires.
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Default quiet period before a compliance check fires.
///
/// Longer than the save debounce so the check observes the saved copy.
pub const DEFAULT_CHECK_DEBOUNCE: Duration = Duration::from_millis(2500);

/// Timing and targeting for the sync coordinator.
#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
    /// Quiet period before a scheduled save fires.
    pub save_debounce: Duration,
    /// Quiet period before a compliance check fires.
    pub check_debounce: Duration,
    /// Platform the compliance checks target.
    pub platform: Platform,
    /// Canvas format the compliance checks target.
    pub format: CanvasFormat,
}

impl SyncConfig {
    /// Create a config with default debounce windows.
    #[must_use]
    pub fn new(platform: Platform, format: CanvasFormat) -> Self {
        Self {
            save_debounce: DEFAULT_SAVE_DEBOUNCE,
            check_debounce: DEFAULT_CHECK_DEBOUNCE,
            platform,
            format,
        }
    }

    /// Override the save debounce window.
    #[must_use]
    pub fn with_save_debounce(mut self, window: Duration) -> Self {
        self.save_debounce = window;
        self
    }

    /// Override the compliance debounce window.
    #[must_use]
    pub fn with_check_debounce(mut self, window: Duration) -> Self {
        self.check_debounce = window;
        self
    }
}

/// Everything a design session needs at construction.
pub struct SessionConfig {
    /// Design store the session loads from and saves to.
    pub store: Arc<dyn DesignStore>,
    /// Compliance service for advisory checks.
    pub compliance: Arc<dyn ComplianceService>,
    /// Renderer for exports.
    pub renderer: Arc<dyn DesignRenderer>,
    /// Sync timing and targeting.
    pub sync: SyncConfig,
    /// Canvas surface the session projects documents onto.
    pub adapter: Box<dyn CanvasAdapter>,
    /// Maximum undo depth.
    pub history_depth: usize,
}

impl SessionConfig {
    /// Create a config with a null canvas adapter and default history depth.
    #[must_use]
    pub fn new(
        store: Arc<dyn DesignStore>,
        compliance: Arc<dyn ComplianceService>,
        renderer: Arc<dyn DesignRenderer>,
        sync: SyncConfig,
    ) -> Self {
        Self {
            store,
            compliance,
            renderer,
            sync,
            adapter: Box::new(NullAdapter),
            history_depth: studio_core::DEFAULT_HISTORY_DEPTH,
        }
    }

    /// Attach a canvas adapter.
    #[must_use]
    pub fn with_adapter(mut self, adapter: Box<dyn CanvasAdapter>) -> Self {
        self.adapter = adapter;
        self
    }

    /// Override the undo depth.
    #[must_use]
    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("sync", &self.sync)
            .field("history_depth", &self.history_depth)
            .finish_non_exhaustive()
    }
}
