//! HTTP implementation of [`DocQaBackend`] against the versioned REST API.
//!
//! Plain request/response with a fixed overall timeout. Error bodies are
//! mined for their `detail` field so validation messages ("Unsupported file
//! type", "No documents indexed") reach the user verbatim.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;

use super::backend::{ApiError, DocQaBackend, ProgressSender};
use super::types::{
    AskRequest, AskResponse, DeleteResponse, Document, DocumentListResponse, HealthSnapshot,
};

/// Upload bodies are streamed in chunks of this size so progress can be
/// reported as the connection consumes them.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Shape of FastAPI-style error bodies: `{"detail": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Extracts the `detail` field from an error body, falling back to the
    /// raw body text, falling back to the bare status code.
    async fn error_from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.clone()
                }
            });
        ApiError::Api { status, message }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(response).await)
        }
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

fn parse(e: reqwest::Error) -> ApiError {
    ApiError::Parse(e.to_string())
}

/// MIME type by extension for the upload part. Unknown extensions get a
/// generic type; the backend rejects them with a detail message.
fn mime_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

/// Chunked view of the file bytes that reports cumulative percentage as each
/// chunk is pulled off the stream.
fn progress_chunks(
    bytes: Vec<u8>,
    progress: ProgressSender,
) -> impl futures::Stream<Item = Result<Vec<u8>, std::io::Error>> {
    let total = bytes.len().max(1);
    let chunks: Vec<Vec<u8>> = bytes
        .chunks(UPLOAD_CHUNK_SIZE)
        .map(|c| c.to_vec())
        .collect();

    let mut sent = 0usize;
    futures::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len();
        let pct = ((sent * 100) / total) as u8;
        // Receiver gone means the UI stopped caring; keep uploading.
        let _ = progress.send(pct);
        Ok::<Vec<u8>, std::io::Error>(chunk)
    }))
}

fn progress_body(bytes: Vec<u8>, progress: ProgressSender) -> reqwest::Body {
    reqwest::Body::wrap_stream(progress_chunks(bytes, progress))
}

#[async_trait]
impl DocQaBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn upload_document(
        &self,
        path: &Path,
        progress: ProgressSender,
    ) -> Result<Document, ApiError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::File(format!("{}: {e}", path.display())))?;
        let total = bytes.len() as u64;
        info!("Uploading {filename} ({total} bytes)");

        let part = reqwest::multipart::Part::stream_with_length(
            progress_body(bytes, progress),
            total,
        )
        .file_name(filename.clone())
        .mime_str(mime_for(&filename))
        .map_err(|e| ApiError::Network(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/documents/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let response = Self::check(response).await?;
        let doc: Document = response.json().await.map_err(parse)?;
        info!("Indexed {} as {} ({} chunks)", filename, doc.doc_id, doc.num_chunks);
        Ok(doc)
    }

    async fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        let response = self
            .client
            .get(self.url("/documents"))
            .send()
            .await
            .map_err(transport)?;
        let response = Self::check(response).await?;
        let list: DocumentListResponse = response.json().await.map_err(parse)?;
        debug!("Listed {} documents", list.documents.len());
        Ok(list.documents)
    }

    async fn delete_document(&self, doc_id: &str) -> Result<DeleteResponse, ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/documents/{doc_id}")))
            .send()
            .await
            .map_err(transport)?;
        let response = Self::check(response).await?;
        response.json().await.map_err(parse)
    }

    async fn ask(&self, request: AskRequest) -> Result<AskResponse, ApiError> {
        debug!(
            "Asking with {} history entries, top_k={}",
            request.conversation_history.len(),
            request.top_k
        );
        let response = self
            .client
            .post(self.url("/chat/ask"))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;
        let response = Self::check(response).await?;
        response.json().await.map_err(parse)
    }

    async fn health(&self) -> Result<HealthSnapshot, ApiError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(transport)?;
        let response = Self::check(response).await?;
        response.json().await.map_err(parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_known_extensions() {
        assert_eq!(mime_for("report.pdf"), "application/pdf");
        assert_eq!(mime_for("notes.TXT"), "text/plain");
        assert_eq!(mime_for("readme.md"), "text/markdown");
        assert_eq!(
            mime_for("thesis.docx"),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[test]
    fn test_mime_for_unknown_extension_falls_back() {
        assert_eq!(mime_for("archive.zip"), "application/octet-stream");
        assert_eq!(mime_for("no_extension"), "application/octet-stream");
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let backend =
            HttpBackend::new("http://localhost:8000/api/v1/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.url("/health"), "http://localhost:8000/api/v1/health");
    }

    #[tokio::test]
    async fn test_progress_chunks_report_full_range() {
        use futures::StreamExt;

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let bytes = vec![0u8; UPLOAD_CHUNK_SIZE * 2 + 100];

        // Drain the stream the way the connection would.
        let mut stream = std::pin::pin!(progress_chunks(bytes, tx));
        let mut drained = 0usize;
        while let Some(chunk) = stream.next().await {
            drained += chunk.unwrap().len();
        }
        assert_eq!(drained, UPLOAD_CHUNK_SIZE * 2 + 100);

        let mut percents = Vec::new();
        while let Ok(p) = rx.try_recv() {
            percents.push(p);
        }
        assert_eq!(percents.last(), Some(&100));
        assert!(percents.windows(2).all(|w| w[0] <= w[1]), "monotonic");
    }
}
