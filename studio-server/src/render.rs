//! Local renderer behind the session's render seam.

use async_trait::async_trait;

use studio_core::{Document, ExportFormat};
use studio_renderer::{DesignExporter, ExportError};
use studio_session::{DesignRenderer, RenderError};

/// In-process renderer wrapping the export pipeline.
///
/// Rasterization is CPU-bound, so each render runs on the blocking pool.
pub struct LocalRenderer {
    exporter: DesignExporter,
}

impl LocalRenderer {
    /// Create a renderer around the given exporter.
    #[must_use]
    pub fn new(exporter: DesignExporter) -> Self {
        Self { exporter }
    }

    /// Create a renderer with default export configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DesignExporter::with_defaults())
    }
}

impl Default for LocalRenderer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl DesignRenderer for LocalRenderer {
    async fn render(
        &self,
        document: &Document,
        format: ExportFormat,
    ) -> Result<Vec<u8>, RenderError> {
        let exporter = self.exporter.clone();
        let document = document.clone();
        tokio::task::spawn_blocking(move || exporter.export(&document, format))
            .await
            .map_err(|e| RenderError::Failed(format!("render task failed: {e}")))?
            .map_err(|e| match e {
                ExportError::UnsupportedElement(msg) => RenderError::UnsupportedElement(msg),
                ExportError::Svg(msg) | ExportError::Encode(msg) => RenderError::Failed(msg),
            })
    }
}
