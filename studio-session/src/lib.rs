//! # `AdStudio` Session
//!
//! The editing session over one design document: undo/redo wiring, debounced
//! save and compliance synchronization, and the service seams an editor UI
//! plugs into.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              DesignSession                  │
//! │  - owns the current Document                │
//! │  - apply_edit: the single mutation gate     │
//! │  - history record / undo / redo             │
//! │  - selection reconciliation                 │
//! ├──────────────────────┬──────────────────────┤
//! │   SyncCoordinator    │    CanvasAdapter     │
//! │  - save debounce     │  - one-way           │
//! │  - check debounce    │    projection        │
//! │  - coalescing        │                      │
//! ├──────────────────────┴──────────────────────┤
//! │  DesignStore │ ComplianceService │ Renderer │
//! │  (traits; memory + HTTP implementations)    │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod adapter;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod services;
pub mod session;
pub mod sync;

pub use adapter::{CanvasAdapter, NullAdapter};
pub use config::{SessionConfig, SyncConfig, DEFAULT_CHECK_DEBOUNCE, DEFAULT_SAVE_DEBOUNCE};
pub use error::{SessionError, SessionResult};
pub use http::{HttpComplianceClient, HttpStore};
pub use memory::{MemoryStore, RuleCompliance};
pub use services::{
    BrandRules, ComplianceError, ComplianceService, DesignGenerator, DesignRenderer, DesignStore,
    GenerateError, GenerateRequest, RenderError, StoreError,
};
pub use session::{CloseMode, DesignSession};
pub use sync::{SaveStatus, SyncCoordinator};

/// Session crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
