use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::types::{AskRequest, AskResponse, DeleteResponse, Document, HealthSnapshot};

/// Receives upload progress as a percentage in `[0, 100]`.
pub type ProgressSender = UnboundedSender<u8>;

/// Errors that can occur while talking to the backend.
/// All of them surface to the user as a message; none are fatal.
#[derive(Debug)]
pub enum ApiError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend returned an error response. `message` is the body's
    /// `detail` field when present, else the raw body.
    Api { status: u16, message: String },
    /// Failed to parse the backend's response.
    Parse(String),
    /// A local file could not be read for upload.
    File(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::File(msg) => write!(f, "file error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The five operations the client needs from the backend.
///
/// `HttpBackend` is the real implementation; tests substitute their own.
/// No retry policy anywhere: a single failure surfaces to the caller.
#[async_trait]
pub trait DocQaBackend: Send + Sync {
    /// Returns the name of the backend (for logging).
    fn name(&self) -> &str;

    /// Uploads one file as multipart form data, reporting progress
    /// percentages through `progress` as the body is consumed.
    async fn upload_document(
        &self,
        path: &Path,
        progress: ProgressSender,
    ) -> Result<Document, ApiError>;

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError>;

    async fn delete_document(&self, doc_id: &str) -> Result<DeleteResponse, ApiError>;

    /// Asks a question with bounded conversation history.
    async fn ask(&self, request: AskRequest) -> Result<AskResponse, ApiError>;

    async fn health(&self) -> Result<HealthSnapshot, ApiError>;
}
