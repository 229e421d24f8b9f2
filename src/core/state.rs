//! # Application State
//!
//! Core business state for ragchat. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn DocQaBackend>   // REST backend handle
//! ├── transcript: Transcript           // conversation messages
//! ├── is_loading: bool                 // a question is in flight
//! ├── health: Option<HealthSnapshot>   // latest backend status (None = unknown)
//! ├── documents: Vec<Document>         // cache of the backend's index
//! ├── status_message: String           // status line text
//! ├── notification: Option<Notification> // transient document-panel toast
//! └── upload: Option<UploadProgress>   // file currently being uploaded
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::{Document, DocQaBackend, HealthSnapshot};
use crate::core::config::ResolvedConfig;
use crate::core::transcript::Transcript;

/// How long a document-panel notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(3500);

/// Advertised upload size ceiling; the backend enforces it.
pub const MAX_UPLOAD_MB: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient, auto-dismissing message shown in the document panel.
#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
}

/// Progress of the file currently being uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadProgress {
    pub filename: String,
    pub percent: u8,
}

pub struct App {
    pub backend: Arc<dyn DocQaBackend>,
    pub transcript: Transcript,
    pub is_loading: bool,
    pub health: Option<HealthSnapshot>,
    pub documents: Vec<Document>,
    pub status_message: String,
    pub notification: Option<Notification>,
    pub upload: Option<UploadProgress>,
    pub top_k: u32,
    pub history_limit: usize,
}

impl App {
    pub fn new(backend: Arc<dyn DocQaBackend>, top_k: u32, history_limit: usize) -> Self {
        Self {
            backend,
            transcript: Transcript::new(),
            is_loading: false,
            health: None,
            documents: Vec::new(),
            status_message: String::from("Ask your documents"),
            notification: None,
            upload: None,
            top_k,
            history_limit,
        }
    }

    pub fn from_config(backend: Arc<dyn DocQaBackend>, config: &ResolvedConfig) -> Self {
        Self::new(backend, config.top_k, config.history_limit)
    }

    pub fn notify(&mut self, text: impl Into<String>, kind: NotificationKind) {
        self.notification = Some(Notification {
            text: text.into(),
            kind,
            expires_at: Instant::now() + NOTIFICATION_TTL,
        });
    }

    /// Drops the notification once its time is up. Called by the event loop
    /// every tick; returns true if the display changed.
    pub fn expire_notification(&mut self) -> bool {
        match &self.notification {
            Some(n) if Instant::now() >= n.expires_at => {
                self.notification = None;
                true
            }
            _ => false,
        }
    }
}
