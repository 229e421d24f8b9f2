//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{
    ApiError, AskRequest, AskResponse, DeleteResponse, DocQaBackend, Document, HealthSnapshot,
    ProgressSender,
};

/// A backend that answers nothing, for tests that never reach the network.
pub struct NoopBackend;

#[async_trait]
impl DocQaBackend for NoopBackend {
    fn name(&self) -> &str {
        "noop"
    }

    async fn upload_document(
        &self,
        _path: &Path,
        _progress: ProgressSender,
    ) -> Result<Document, ApiError> {
        Err(ApiError::Network("noop backend".to_string()))
    }

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        Ok(Vec::new())
    }

    async fn delete_document(&self, _doc_id: &str) -> Result<DeleteResponse, ApiError> {
        Err(ApiError::Network("noop backend".to_string()))
    }

    async fn ask(&self, _request: AskRequest) -> Result<AskResponse, ApiError> {
        Err(ApiError::Network("noop backend".to_string()))
    }

    async fn health(&self) -> Result<HealthSnapshot, ApiError> {
        Err(ApiError::Network("noop backend".to_string()))
    }
}

/// Creates a test App with a NoopBackend and default chat settings.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(NoopBackend), 5, 10)
}

/// A document with the given id and filename and plausible metadata.
pub fn test_document(doc_id: &str, filename: &str) -> Document {
    Document {
        doc_id: doc_id.to_string(),
        filename: filename.to_string(),
        num_chunks: 12,
        size_bytes: 34_567,
    }
}
