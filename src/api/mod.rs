pub mod backend;
pub mod client;
pub mod types;

pub use backend::{ApiError, DocQaBackend, ProgressSender};
pub use client::HttpBackend;
pub use types::{
    AskRequest, AskResponse, DeleteResponse, Document, DocumentListResponse, HealthSnapshot,
    HistoryEntry, Role, SourceChunk,
};
