//! HTTP-backed service clients for the `AdStudio` REST API.
//!
//! Base URLs are explicit constructor arguments; nothing here reads ambient
//! process state.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use studio_core::{CanvasFormat, ComplianceReport, DesignId, Document, Platform};

use crate::services::{ComplianceError, ComplianceService, DesignStore, StoreError};

/// Conflict detail carried in a 409 response body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConflictPayload {
    /// Version currently held by the store.
    pub stored: u64,
    /// Version the caller submitted.
    pub submitted: u64,
}

/// Request body for a compliance check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CheckRequest {
    /// Target platform.
    pub platform: Platform,
    /// Canvas format.
    pub format: CanvasFormat,
}

/// Design store client speaking the `/api/designs` REST surface.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpStore {
    /// Create a client against the given base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn design_url(&self, id: &DesignId) -> Result<Url, StoreError> {
        self.base_url
            .join(&format!("api/designs/{id}"))
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl DesignStore for HttpStore {
    async fn get(&self, id: &DesignId) -> Result<Document, StoreError> {
        let url = self.design_url(id)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<Document>()
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string())),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(*id)),
            status => Err(StoreError::Unavailable(format!(
                "unexpected status {status}"
            ))),
        }
    }

    async fn put(&self, id: &DesignId, document: &Document) -> Result<Document, StoreError> {
        let url = self.design_url(id)?;
        let response = self
            .client
            .put(url)
            .json(document)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<Document>()
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string())),
            StatusCode::CONFLICT => {
                let payload = response
                    .json::<ConflictPayload>()
                    .await
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                Err(StoreError::Conflict {
                    stored: payload.stored,
                    submitted: payload.submitted,
                })
            }
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(*id)),
            status => Err(StoreError::Unavailable(format!(
                "unexpected status {status}"
            ))),
        }
    }
}

/// Compliance client speaking the `/api/designs/{id}/compliance` endpoint.
#[derive(Debug, Clone)]
pub struct HttpComplianceClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpComplianceClient {
    /// Create a client against the given base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl ComplianceService for HttpComplianceClient {
    async fn check(
        &self,
        id: &DesignId,
        platform: Platform,
        format: CanvasFormat,
    ) -> Result<ComplianceReport, ComplianceError> {
        let url = self
            .base_url
            .join(&format!("api/designs/{id}/compliance"))
            .map_err(|e| ComplianceError::Unavailable(e.to_string()))?;
        let response = self
            .client
            .post(url)
            .json(&CheckRequest { platform, format })
            .send()
            .await
            .map_err(|e| ComplianceError::Unavailable(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(ComplianceError::Unavailable(format!(
                "unexpected status {}",
                response.status()
            )));
        }
        response
            .json::<ComplianceReport>()
            .await
            .map_err(|e| ComplianceError::Unavailable(e.to_string()))
    }
}
