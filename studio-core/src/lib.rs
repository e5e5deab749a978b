//! # `AdStudio` Core
//!
//! Design document model for ad creatives: elements, mutation operations,
//! undo/redo history, and platform compliance rules.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                studio-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Document Model  │  History Stack           │
//! │  - Elements      │  - Snapshots             │
//! │  - Mutations     │  - Undo/redo cursor      │
//! │  - Invariants    │  - Branch truncation     │
//! ├─────────────────────────────────────────────┤
//! │  Platform Specs  │  Compliance Rules        │
//! │  - Dimensions    │  - Violations            │
//! │  - Constraints   │  - Scoring               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The document model is persistent: every mutation returns a new
//! [`Document`] value, which keeps history snapshots cheap and free of
//! aliasing into live editor state.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compliance;
pub mod document;
pub mod element;
pub mod error;
pub mod export;
pub mod history;
pub mod platform;

pub use compliance::{evaluate, ComplianceReport, Severity, Violation};
pub use document::{current_timestamp_ms, Background, DesignId, Document};
pub use export::ExportFormat;
pub use element::{
    Element, ElementId, ElementKind, ElementPatch, FontWeight, ImageFormat, Placement, TextAlign,
};
pub use error::{AtBoundary, DocumentError, DocumentResult};
pub use history::{HistoryStack, DEFAULT_HISTORY_DEPTH};
pub use platform::{spec_for, CanvasFormat, Platform, PlatformSpec};

/// Core crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
