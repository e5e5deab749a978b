//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use studio_session::{ComplianceError, GenerateError, RenderError, StoreError};

/// Errors surfaced by the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The design does not exist.
    #[error("Design not found")]
    NotFound,

    /// The request was malformed or semantically invalid.
    #[error("{0}")]
    Validation(String),

    /// The stored design version is newer than the submitted one.
    #[error("Version conflict: stored {stored}, submitted {submitted}")]
    Conflict {
        /// Version currently held by the store.
        stored: u64,
        /// Version the caller submitted.
        submitted: u64,
    },

    /// An internal failure.
    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::Conflict { stored, submitted } => Self::Conflict { stored, submitted },
            StoreError::Unavailable(msg) => Self::Internal(msg),
        }
    }
}

impl From<ComplianceError> for ApiError {
    fn from(err: ComplianceError) -> Self {
        match err {
            ComplianceError::Unavailable(msg) => Self::Internal(msg),
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::UnsupportedElement(msg) => Self::Validation(msg),
            RenderError::Failed(msg) => Self::Internal(msg),
        }
    }
}

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::UnsupportedPlacement(msg) | GenerateError::InvalidPrompt(msg) => {
                Self::Validation(msg)
            }
            GenerateError::Failed(msg) => Self::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
            Self::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        let mut body = serde_json::json!({
            "error": code,
            "message": self.to_string(),
        });
        if let Self::Conflict { stored, submitted } = &self {
            body["stored"] = (*stored).into();
            body["submitted"] = (*submitted).into();
        }

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}
