//! Wire types for the document Q&A REST API.
//!
//! Field names match the backend's JSON exactly; these structs are the only
//! place the wire format is spelled out. Everything the backend produces is
//! read-only on the client side.

use serde::{Deserialize, Serialize};

/// Metadata for one indexed document, as returned by upload and list.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub doc_id: String,
    pub filename: String,
    pub num_chunks: u32,
    pub size_bytes: u64,
}

#[derive(Deserialize, Debug)]
pub struct DocumentListResponse {
    pub documents: Vec<Document>,
}

/// Confirmation body for `DELETE /documents/{doc_id}`.
#[derive(Deserialize, Debug)]
pub struct DeleteResponse {
    pub message: String,
    pub doc_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the bounded conversation history sent with a question.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

#[derive(Serialize, Debug)]
pub struct AskRequest {
    pub question: String,
    pub conversation_history: Vec<HistoryEntry>,
    pub top_k: u32,
}

/// A retrieved excerpt justifying part of an answer.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SourceChunk {
    pub filename: String,
    pub chunk_index: u32,
    /// Similarity score in `[0, 1]`.
    pub relevance_score: f32,
    pub content: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceChunk>,
    pub model_used: String,
    /// The backend omits this for providers that don't report usage.
    #[serde(default)]
    pub tokens_used: Option<u32>,
    pub response_time_ms: u64,
}

/// Point-in-time status of the backend's index and model configuration.
/// Refreshed periodically and after every chat exchange; always replaced
/// wholesale, never merged.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HealthSnapshot {
    pub vector_store_ready: bool,
    pub num_total_chunks: u64,
    pub num_indexed_documents: u32,
    pub llm_model: String,
    pub embedding_model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Contract test: the ask request must serialize to the exact JSON the
    /// backend validates against.
    #[test]
    fn test_ask_request_serialization() {
        let req = AskRequest {
            question: "What is X?".to_string(),
            conversation_history: vec![
                HistoryEntry {
                    role: Role::User,
                    content: "hello".to_string(),
                },
                HistoryEntry {
                    role: Role::Assistant,
                    content: "hi there".to_string(),
                },
            ],
            top_k: 5,
        };

        let serialized = serde_json::to_string(&req).unwrap();
        let expected = r#"{"question":"What is X?","conversation_history":[{"role":"user","content":"hello"},{"role":"assistant","content":"hi there"}],"top_k":5}"#;
        assert_eq!(serialized, expected);
    }

    #[test]
    fn test_ask_response_deserialization() {
        let body = r#"{
            "answer": "X is Y",
            "sources": [
                {"doc_id": "d1", "filename": "x.pdf", "content": "X is Y because...", "chunk_index": 3, "relevance_score": 0.91}
            ],
            "model_used": "gpt-4",
            "tokens_used": 42,
            "response_time_ms": 800
        }"#;
        let res: AskResponse = serde_json::from_str(body).unwrap();
        assert_eq!(res.answer, "X is Y");
        assert_eq!(res.sources.len(), 1);
        assert_eq!(res.sources[0].chunk_index, 3);
        assert_eq!(res.tokens_used, Some(42));
    }

    #[test]
    fn test_ask_response_tolerates_missing_optionals() {
        // Backends without usage reporting omit tokens_used; sources may be absent.
        let body = r#"{"answer": "ok", "model_used": "m", "response_time_ms": 10}"#;
        let res: AskResponse = serde_json::from_str(body).unwrap();
        assert!(res.sources.is_empty());
        assert_eq!(res.tokens_used, None);
    }

    #[test]
    fn test_health_snapshot_ignores_extra_fields() {
        // The health endpoint also reports status/version; we only keep what
        // the status bar shows.
        let body = r#"{
            "status": "ok",
            "version": "1.0.0",
            "vector_store_ready": true,
            "num_indexed_documents": 2,
            "num_total_chunks": 57,
            "embedding_model": "all-MiniLM-L6-v2",
            "llm_model": "gpt-4"
        }"#;
        let health: HealthSnapshot = serde_json::from_str(body).unwrap();
        assert!(health.vector_store_ready);
        assert_eq!(health.num_total_chunks, 57);
        assert_eq!(health.llm_model, "gpt-4");
    }
}
