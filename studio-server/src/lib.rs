//! # AdStudio Server Library
//!
//! Shared types and router assembly for the design service.
//! This library is used by both the binary and integration tests.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use studio_session::MemoryStore;

pub mod error;
pub mod generator;
pub mod health;
pub mod metrics;
pub mod render;
pub mod routes;

pub use error::ApiError;
pub use generator::TemplateGenerator;
pub use render::LocalRenderer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// In-memory design store with version-based conflict detection.
    pub store: MemoryStore,
    /// Template design generator.
    pub generator: Arc<TemplateGenerator>,
    /// Export renderer.
    pub renderer: Arc<LocalRenderer>,
}

impl AppState {
    /// Create state with an empty store and default renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            generator: Arc::new(TemplateGenerator::new()),
            renderer: Arc::new(LocalRenderer::with_defaults()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the API router: design CRUD, compliance, export, health probes.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/health", get(health::readiness))
        .route("/api/designs/generate", post(routes::generate_design))
        .route("/api/designs", get(routes::list_designs))
        .route(
            "/api/designs/{id}",
            get(routes::get_design).put(routes::put_design),
        )
        .route(
            "/api/designs/{id}/compliance",
            post(routes::check_compliance),
        )
        .route("/api/designs/{id}/export", get(routes::export_design))
        .with_state(state)
}
