//! Contracts for the external services a session talks to.
//!
//! The session core never reaches for ambient globals: every collaborator is
//! injected through one of these traits, so tests can substitute fakes and
//! the same session logic drives the in-memory store, the HTTP store, or
//! anything else.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use studio_core::{CanvasFormat, ComplianceReport, DesignId, Document, ExportFormat, Platform};
use thiserror::Error;

/// Errors from the design store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No design with the given ID exists.
    #[error("Design not found: {0}")]
    NotFound(DesignId),

    /// The stored version is newer than the submitted document's version.
    /// Surfaced to the user as "reload required"; never auto-merged.
    #[error("Version conflict: stored {stored}, submitted {submitted}")]
    Conflict {
        /// Version currently held by the store.
        stored: u64,
        /// Version the caller submitted.
        submitted: u64,
    },

    /// The store could not be reached or failed internally.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the compliance service.
///
/// Always advisory: a failed check is surfaced as "no result available",
/// never as an edit-blocking fault.
#[derive(Debug, Error)]
pub enum ComplianceError {
    /// The service could not be reached or failed internally.
    #[error("Compliance service unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the export/render service.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The document contains an element the renderer cannot represent.
    #[error("Unsupported element: {0}")]
    UnsupportedElement(String),

    /// Rendering or encoding failed.
    #[error("Render failed: {0}")]
    Failed(String),
}

/// Errors from the design-generation service.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The requested platform/format combination does not exist.
    #[error("Unsupported placement: {0}")]
    UnsupportedPlacement(String),

    /// The prompt was rejected before generation.
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    /// Generation failed.
    #[error("Generation failed: {0}")]
    Failed(String),
}

/// Persistent storage of design documents with optimistic concurrency.
///
/// `put` succeeds when the stored version is not newer than the submitted
/// document's version; the stored copy then carries `version + 1` and a
/// fresh timestamp, and is returned to the caller.
#[async_trait]
pub trait DesignStore: Send + Sync {
    /// Fetch a document by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown designs,
    /// [`StoreError::Unavailable`] when the store cannot be reached.
    async fn get(&self, id: &DesignId) -> Result<Document, StoreError>;

    /// Store a document, detecting conflicting concurrent writes by version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the stored version is newer than
    /// the submitted one, [`StoreError::Unavailable`] on transport failures.
    async fn put(&self, id: &DesignId, document: &Document) -> Result<Document, StoreError>;
}

/// Platform compliance checking for a stored design.
#[async_trait]
pub trait ComplianceService: Send + Sync {
    /// Check the design against the platform's placement rules.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::Unavailable`] when the service fails; the
    /// caller treats that as "no result available".
    async fn check(
        &self,
        id: &DesignId,
        platform: Platform,
        format: CanvasFormat,
    ) -> Result<ComplianceReport, ComplianceError>;
}

/// Rendering of a document to an exportable byte stream.
#[async_trait]
pub trait DesignRenderer: Send + Sync {
    /// Render the document to the given format.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedElement`] for content the renderer
    /// cannot represent, [`RenderError::Failed`] on any other failure.
    async fn render(
        &self,
        document: &Document,
        format: ExportFormat,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Brand rules constraining generated designs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRules {
    /// Brand palette as hex colors, most prominent first.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Brand font family names.
    #[serde(default)]
    pub fonts: Vec<String>,
}

/// Request for the design-generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Free-form description of the creative.
    pub prompt: String,
    /// Target platform.
    pub platform: Platform,
    /// Canvas format.
    pub format: CanvasFormat,
    /// Optional brand constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_rules: Option<BrandRules>,
}

/// Opaque design generation: prompt in, well-formed document out.
#[async_trait]
pub trait DesignGenerator: Send + Sync {
    /// Generate a new design document.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidPrompt`] or
    /// [`GenerateError::UnsupportedPlacement`] for rejected requests,
    /// [`GenerateError::Failed`] when generation itself fails.
    async fn generate(&self, request: &GenerateRequest) -> Result<Document, GenerateError>;
}
