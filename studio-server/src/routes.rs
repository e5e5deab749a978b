//! API route handlers.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use studio_core::{evaluate, ComplianceReport, DesignId, Document, ExportFormat};
use studio_session::http::CheckRequest;
use studio_session::{DesignGenerator, DesignRenderer, DesignStore, GenerateRequest, StoreError};

use crate::error::ApiError;
use crate::metrics;
use crate::AppState;

/// Query parameters for the export endpoint.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Target format: png, jpg, svg, or pdf.
    pub format: String,
}

fn parse_design_id(raw: &str) -> Result<DesignId, ApiError> {
    DesignId::parse(raw).map_err(|_| ApiError::Validation(format!("invalid design id: {raw}")))
}

/// Generate a new design from a prompt.
#[tracing::instrument(name = "generate_design", skip(state, request), fields(platform = %request.platform, format = %request.format))]
pub async fn generate_design(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let document = state.generator.generate(&request).await?;
    state.store.insert(document.clone());
    metrics::record_design_generated(request.platform);
    tracing::info!(design = %document.id, "design generated");
    Ok((StatusCode::CREATED, Json(document)))
}

/// List all designs, most recently updated first.
#[tracing::instrument(name = "list_designs", skip(state))]
pub async fn list_designs(State(state): State<AppState>) -> Json<Vec<Document>> {
    Json(state.store.list())
}

/// Fetch one design.
#[tracing::instrument(name = "get_design", skip(state))]
pub async fn get_design(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let id = parse_design_id(&id)?;
    Ok(Json(state.store.get(&id).await?))
}

/// Store a design revision, detecting conflicting concurrent writes.
#[tracing::instrument(name = "put_design", skip(state, document))]
pub async fn put_design(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(document): Json<Document>,
) -> Result<Json<Document>, ApiError> {
    let id = parse_design_id(&id)?;
    if document.id != id {
        return Err(ApiError::Validation(
            "document id does not match the path".to_string(),
        ));
    }

    match state.store.put(&id, &document).await {
        Ok(stored) => {
            metrics::record_design_save("accepted");
            tracing::debug!(design = %id, version = stored.version, "design stored");
            Ok(Json(stored))
        }
        Err(err @ StoreError::Conflict { .. }) => {
            metrics::record_design_save("conflict");
            Err(err.into())
        }
        Err(err) => {
            metrics::record_design_save("rejected");
            Err(err.into())
        }
    }
}

/// Check a stored design against a platform's placement rules.
#[tracing::instrument(name = "check_compliance", skip(state, request), fields(platform = %request.platform))]
pub async fn check_compliance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CheckRequest>,
) -> Result<Json<ComplianceReport>, ApiError> {
    let id = parse_design_id(&id)?;
    let document = state.store.get(&id).await?;
    let report = evaluate(&document, request.platform, request.format);
    metrics::record_compliance_check(report.compliant);
    Ok(Json(report))
}

/// Export a stored design as a downloadable file.
#[tracing::instrument(name = "export_design", skip(state))]
pub async fn export_design(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let id = parse_design_id(&id)?;
    let format: ExportFormat = query
        .format
        .parse()
        .map_err(|_| ApiError::Validation(format!("unsupported export format: {}", query.format)))?;
    let document = state.store.get(&id).await?;
    let bytes = state.renderer.render(&document, format).await?;
    metrics::record_export(format);

    let disposition = format!("attachment; filename=design_{id}.{}", format.extension());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
