//! In-process service implementations.
//!
//! [`MemoryStore`] is the canonical reference for the store's optimistic
//! concurrency semantics; the server builds on it and tests inject it as the
//! fake behind the [`DesignStore`] trait.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use studio_core::{
    current_timestamp_ms, evaluate, CanvasFormat, ComplianceReport, DesignId, Document, Platform,
};

use crate::services::{ComplianceError, ComplianceService, DesignStore, StoreError};

/// Thread-safe in-memory design store with version-based conflict detection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    designs: Arc<RwLock<HashMap<DesignId, Document>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created document, as the generation service would.
    ///
    /// Unlike [`DesignStore::put`] this does not bump the version: the
    /// document is stored exactly as created.
    pub fn insert(&self, document: Document) {
        let mut designs = self
            .designs
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        designs.insert(document.id, document);
    }

    /// All stored documents, most recently updated first.
    #[must_use]
    pub fn list(&self) -> Vec<Document> {
        let designs = self
            .designs
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut all: Vec<_> = designs.values().cloned().collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        all
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        let designs = self
            .designs
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        designs.len()
    }

    /// Check if the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DesignStore for MemoryStore {
    async fn get(&self, id: &DesignId) -> Result<Document, StoreError> {
        let designs = self
            .designs
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        designs.get(id).cloned().ok_or(StoreError::NotFound(*id))
    }

    async fn put(&self, id: &DesignId, document: &Document) -> Result<Document, StoreError> {
        let mut designs = self
            .designs
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(stored) = designs.get(id) {
            if stored.version > document.version {
                return Err(StoreError::Conflict {
                    stored: stored.version,
                    submitted: document.version,
                });
            }
        }
        let mut accepted = document.clone();
        accepted.version = document.version + 1;
        accepted.updated_at = current_timestamp_ms();
        designs.insert(*id, accepted.clone());
        Ok(accepted)
    }
}

/// Compliance service that evaluates the stored copy of a design against the
/// built-in rule engine.
#[derive(Debug, Clone)]
pub struct RuleCompliance<S> {
    store: S,
}

impl<S> RuleCompliance<S> {
    /// Create a compliance service backed by the given store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: DesignStore> ComplianceService for RuleCompliance<S> {
    async fn check(
        &self,
        id: &DesignId,
        platform: Platform,
        format: CanvasFormat,
    ) -> Result<ComplianceReport, ComplianceError> {
        let document = self
            .store
            .get(id)
            .await
            .map_err(|e| ComplianceError::Unavailable(e.to_string()))?;
        Ok(evaluate(&document, platform, format))
    }
}
