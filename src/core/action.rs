//! # Actions
//!
//! Everything that can happen in ragchat becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! Backend answers? That's `Action::AnswerReceived(response)`.
//!
//! The `update()` function takes the current state and an action and
//! mutates the state. No side effects here: network work is described by
//! the returned `Effect` and performed by spawned tasks in the TUI layer.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: feed actions, assert on state and effect.

use std::path::PathBuf;

use log::info;

use crate::api::{AskResponse, Document, HealthSnapshot, HistoryEntry};
use crate::core::state::{App, NotificationKind, UploadProgress};

#[derive(Debug, Clone)]
pub enum Action {
    /// Raw input submission: either a question or a slash command.
    Submit(String),
    /// The ask call resolved successfully.
    AnswerReceived(AskResponse),
    /// The ask call failed; carries the human-readable message.
    AskFailed(String),
    ClearChat,
    HealthRefreshed(HealthSnapshot),
    /// Initial `GET /documents` result.
    DocumentsLoaded(Vec<Document>),
    UploadStarted { filename: String },
    UploadProgressed { filename: String, percent: u8 },
    /// One file of an upload batch was indexed.
    DocumentIndexed(Document),
    /// One file of an upload batch failed; the rest of the batch continues.
    UploadFailed { filename: String, message: String },
    DocumentDeleted { doc_id: String },
    DeleteFailed { message: String },
    Quit,
}

/// I/O the event loop must perform after an update.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Issue the ask call with history built *before* this exchange.
    SpawnAsk {
        question: String,
        history: Vec<HistoryEntry>,
        top_k: u32,
    },
    /// Fetch a fresh health snapshot (failures are logged and swallowed).
    RefreshHealth,
    /// Upload files sequentially, one outcome per file.
    SpawnUpload { paths: Vec<PathBuf> },
    SpawnDelete { doc_id: String },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, &text),

        Action::AnswerReceived(response) => {
            app.transcript.resolve_pending(response);
            app.is_loading = false;
            Effect::RefreshHealth
        }

        Action::AskFailed(message) => {
            app.transcript.fail_pending(message);
            app.is_loading = false;
            Effect::RefreshHealth
        }

        Action::ClearChat => {
            app.transcript.clear();
            app.status_message = String::from("Chat cleared");
            Effect::None
        }

        // Wholesale replacement; overlapping refreshes are last-write-wins.
        Action::HealthRefreshed(snapshot) => {
            app.health = Some(snapshot);
            Effect::None
        }

        Action::DocumentsLoaded(documents) => {
            info!("Loaded {} indexed documents", documents.len());
            app.documents = documents;
            Effect::None
        }

        Action::UploadStarted { filename } => {
            app.upload = Some(UploadProgress {
                filename,
                percent: 0,
            });
            Effect::None
        }

        Action::UploadProgressed { filename, percent } => {
            if let Some(upload) = &mut app.upload {
                if upload.filename == filename {
                    upload.percent = percent;
                }
            }
            Effect::None
        }

        Action::DocumentIndexed(doc) => {
            app.upload = None;
            app.notify(
                format!(
                    "\"{}\" indexed - {} chunks ready",
                    doc.filename, doc.num_chunks
                ),
                NotificationKind::Success,
            );
            app.documents.push(doc);
            Effect::None
        }

        Action::UploadFailed { filename, message } => {
            app.upload = None;
            app.notify(
                format!("Failed to upload {filename}: {message}"),
                NotificationKind::Error,
            );
            Effect::None
        }

        Action::DocumentDeleted { doc_id } => {
            app.documents.retain(|d| d.doc_id != doc_id);
            app.notify("Document removed from index", NotificationKind::Success);
            Effect::None
        }

        Action::DeleteFailed { message } => {
            app.notify(format!("Delete failed: {message}"), NotificationKind::Error);
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

/// Handles Enter on the input box. Slash commands drive the document panel;
/// anything else is a question for the backend.
fn submit(app: &mut App, text: &str) -> Effect {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix('/') {
        return command(app, rest);
    }

    // A blank question or one sent while a request is in flight is a no-op:
    // transcript untouched, no call issued.
    if trimmed.is_empty() || app.is_loading {
        return Effect::None;
    }

    let question = trimmed.to_string();
    // History is the state *prior* to this exchange; the new user message
    // is not part of its own context.
    let history = app.transcript.history(app.history_limit);
    app.transcript.begin_exchange(question.clone());
    app.is_loading = true;

    Effect::SpawnAsk {
        question,
        history,
        top_k: app.top_k,
    }
}

fn command(app: &mut App, input: &str) -> Effect {
    let mut parts = input.split_whitespace();
    let name = parts.next().unwrap_or("");

    match name {
        "clear" => {
            app.transcript.clear();
            app.status_message = String::from("Chat cleared");
            Effect::None
        }
        "quit" | "q" => Effect::Quit,
        "upload" => {
            let paths: Vec<PathBuf> = parts.map(PathBuf::from).collect();
            if paths.is_empty() {
                app.status_message = String::from("Usage: /upload <path> [<path>...]");
                return Effect::None;
            }
            Effect::SpawnUpload { paths }
        }
        "delete" => {
            // 1-based index as shown in the document panel.
            let index = parts.next().and_then(|s| s.parse::<usize>().ok());
            match index.and_then(|n| n.checked_sub(1)).and_then(|i| app.documents.get(i)) {
                Some(doc) => Effect::SpawnDelete {
                    doc_id: doc.doc_id.clone(),
                },
                None => {
                    app.status_message = String::from("Usage: /delete <n>  (see panel numbering)");
                    Effect::None
                }
            }
        }
        other => {
            app.status_message = format!("Unknown command: /{other}");
            Effect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;
    use crate::core::state::NotificationKind;
    use crate::core::transcript::ChatMessage;
    use crate::test_support::{test_app, test_document};

    fn answer(text: &str) -> AskResponse {
        AskResponse {
            answer: text.to_string(),
            sources: vec![],
            model_used: "gpt-4".to_string(),
            tokens_used: Some(42),
            response_time_ms: 800,
        }
    }

    // ==========================================================================
    // Submit guards
    // ==========================================================================

    #[test]
    fn test_submit_blank_input_is_noop() {
        let mut app = test_app();
        for input in ["", "   ", "\t\n"] {
            let effect = update(&mut app, Action::Submit(input.to_string()));
            assert_eq!(effect, Effect::None);
            assert!(app.transcript.is_empty());
            assert!(!app.is_loading);
        }
    }

    #[test]
    fn test_submit_while_loading_is_noop() {
        let mut app = test_app();
        update(&mut app, Action::Submit("first".to_string()));
        assert!(app.is_loading);
        let len_before = app.transcript.len();

        let effect = update(&mut app, Action::Submit("second".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.transcript.len(), len_before);
    }

    #[test]
    fn test_submit_trims_before_sending() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("  What is X?  ".to_string()));
        match effect {
            Effect::SpawnAsk { question, .. } => assert_eq!(question, "What is X?"),
            other => panic!("expected SpawnAsk, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_appends_user_then_placeholder_and_sets_loading() {
        let mut app = test_app();
        update(&mut app, Action::Submit("What is X?".to_string()));

        assert!(app.is_loading);
        assert_eq!(app.transcript.len(), 2);
        assert!(app.transcript.messages()[1].is_pending());
    }

    #[test]
    fn test_history_excludes_current_question_and_placeholder() {
        let mut app = test_app();
        update(&mut app, Action::Submit("q1".to_string()));
        update(&mut app, Action::AnswerReceived(answer("a1")));

        let effect = update(&mut app, Action::Submit("q2".to_string()));
        match effect {
            Effect::SpawnAsk { history, .. } => {
                assert_eq!(history.len(), 2);
                assert_eq!(history[0].content, "q1");
                assert_eq!(history[1].content, "a1");
            }
            other => panic!("expected SpawnAsk, got {other:?}"),
        }
    }

    #[test]
    fn test_history_never_exceeds_limit() {
        let mut app = test_app();
        for i in 0..12 {
            update(&mut app, Action::Submit(format!("q{i}")));
            update(&mut app, Action::AnswerReceived(answer(&format!("a{i}"))));
        }
        let effect = update(&mut app, Action::Submit("final".to_string()));
        match effect {
            Effect::SpawnAsk { history, top_k, .. } => {
                assert_eq!(history.len(), 10);
                assert_eq!(top_k, 5);
                assert!(history.iter().all(|e| !e.content.is_empty()));
            }
            other => panic!("expected SpawnAsk, got {other:?}"),
        }
    }

    // ==========================================================================
    // Exchange resolution
    // ==========================================================================

    /// The success scenario from end to end: one question, one mocked answer,
    /// final transcript is exactly [User, Assistant] with the answer's fields.
    #[test]
    fn test_successful_exchange_finalizes_transcript() {
        let mut app = test_app();
        update(&mut app, Action::Submit("What is X?".to_string()));
        let effect = update(&mut app, Action::AnswerReceived(answer("X is Y")));

        assert_eq!(effect, Effect::RefreshHealth);
        assert!(!app.is_loading);
        assert!(!app.transcript.has_pending());

        let messages = app.transcript.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0],
            ChatMessage::User {
                content: "What is X?".to_string()
            }
        );
        match &messages[1] {
            ChatMessage::Assistant { content, sources, meta } => {
                assert_eq!(content, "X is Y");
                assert!(sources.is_empty());
                assert_eq!(meta.model_used, "gpt-4");
                assert_eq!(meta.tokens_used, 42);
                assert_eq!(meta.response_time_ms, 800);
            }
            other => panic!("expected Assistant, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_exchange_leaves_error_bubble() {
        let mut app = test_app();
        update(&mut app, Action::Submit("What is X?".to_string()));
        let effect = update(
            &mut app,
            Action::AskFailed("Error: API error (HTTP 400): No documents indexed".to_string()),
        );

        assert_eq!(effect, Effect::RefreshHealth);
        assert!(!app.is_loading);
        assert!(!app.transcript.has_pending());
        match app.transcript.messages().last().unwrap() {
            ChatMessage::Failed { content } => {
                assert!(content.contains("No documents indexed"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_no_two_consecutive_placeholders_across_rapid_sends() {
        let mut app = test_app();
        // Rapid repeated sends: only the first goes through while in flight.
        update(&mut app, Action::Submit("one".to_string()));
        update(&mut app, Action::Submit("two".to_string()));
        update(&mut app, Action::Submit("three".to_string()));

        let pending = app
            .transcript
            .messages()
            .iter()
            .filter(|m| m.is_pending())
            .count();
        assert_eq!(pending, 1);
        assert!(app.transcript.messages().last().unwrap().is_pending());
    }

    // ==========================================================================
    // Commands
    // ==========================================================================

    #[test]
    fn test_clear_command_empties_transcript() {
        let mut app = test_app();
        update(&mut app, Action::Submit("q".to_string()));
        update(&mut app, Action::AnswerReceived(answer("a")));

        let effect = update(&mut app, Action::Submit("/clear".to_string()));
        assert_eq!(effect, Effect::None);
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn test_quit_command() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Submit("/quit".to_string())), Effect::Quit);
        assert_eq!(update(&mut app, Action::Submit("/q".to_string())), Effect::Quit);
    }

    #[test]
    fn test_upload_command_collects_paths() {
        let mut app = test_app();
        let effect = update(
            &mut app,
            Action::Submit("/upload notes.md paper.pdf".to_string()),
        );
        assert_eq!(
            effect,
            Effect::SpawnUpload {
                paths: vec![PathBuf::from("notes.md"), PathBuf::from("paper.pdf")]
            }
        );
    }

    #[test]
    fn test_upload_command_without_paths_shows_usage() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("/upload".to_string()));
        assert_eq!(effect, Effect::None);
        assert!(app.status_message.starts_with("Usage: /upload"));
    }

    #[test]
    fn test_delete_command_resolves_panel_index() {
        let mut app = test_app();
        app.documents = vec![test_document("d1", "a.pdf"), test_document("d2", "b.txt")];

        let effect = update(&mut app, Action::Submit("/delete 2".to_string()));
        assert_eq!(
            effect,
            Effect::SpawnDelete {
                doc_id: "d2".to_string()
            }
        );
    }

    #[test]
    fn test_delete_command_out_of_range_is_noop() {
        let mut app = test_app();
        app.documents = vec![test_document("d1", "a.pdf")];
        assert_eq!(
            update(&mut app, Action::Submit("/delete 5".to_string())),
            Effect::None
        );
        assert_eq!(
            update(&mut app, Action::Submit("/delete 0".to_string())),
            Effect::None
        );
        assert_eq!(app.documents.len(), 1);
    }

    #[test]
    fn test_unknown_command_sets_status() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("/frobnicate".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.status_message, "Unknown command: /frobnicate");
    }

    // ==========================================================================
    // Document collection
    // ==========================================================================

    #[test]
    fn test_upload_progress_tracks_current_file() {
        let mut app = test_app();
        update(
            &mut app,
            Action::UploadStarted {
                filename: "a.pdf".to_string(),
            },
        );
        update(
            &mut app,
            Action::UploadProgressed {
                filename: "a.pdf".to_string(),
                percent: 40,
            },
        );
        assert_eq!(app.upload.as_ref().unwrap().percent, 40);

        // Progress for a stale filename is ignored.
        update(
            &mut app,
            Action::UploadProgressed {
                filename: "other.pdf".to_string(),
                percent: 99,
            },
        );
        assert_eq!(app.upload.as_ref().unwrap().percent, 40);
    }

    #[test]
    fn test_document_indexed_appends_and_notifies() {
        let mut app = test_app();
        update(&mut app, Action::DocumentIndexed(test_document("d1", "a.pdf")));

        assert_eq!(app.documents.len(), 1);
        assert!(app.upload.is_none());
        let n = app.notification.as_ref().unwrap();
        assert_eq!(n.kind, NotificationKind::Success);
        assert!(n.text.contains("a.pdf"));
    }

    /// The oversized-upload scenario: the backend rejects, the collection is
    /// unchanged, and exactly one error notification is produced.
    #[test]
    fn test_upload_failure_leaves_collection_unchanged() {
        let mut app = test_app();
        app.documents = vec![test_document("d1", "a.pdf")];
        let before = app.documents.clone();

        update(
            &mut app,
            Action::UploadFailed {
                filename: "huge.pdf".to_string(),
                message: "API error (HTTP 413): File exceeds 50MB limit".to_string(),
            },
        );

        assert_eq!(app.documents, before);
        let n = app.notification.as_ref().unwrap();
        assert_eq!(n.kind, NotificationKind::Error);
        assert!(n.text.contains("huge.pdf"));
    }

    #[test]
    fn test_document_deleted_removes_from_collection() {
        let mut app = test_app();
        app.documents = vec![test_document("d1", "a.pdf"), test_document("d2", "b.txt")];

        update(
            &mut app,
            Action::DocumentDeleted {
                doc_id: "d1".to_string(),
            },
        );
        assert_eq!(app.documents.len(), 1);
        assert_eq!(app.documents[0].doc_id, "d2");
    }

    #[test]
    fn test_health_refresh_replaces_snapshot_wholesale() {
        let mut app = test_app();
        let first = HealthSnapshot {
            vector_store_ready: false,
            num_total_chunks: 0,
            num_indexed_documents: 0,
            llm_model: "gpt-4".to_string(),
            embedding_model: "minilm".to_string(),
        };
        let second = HealthSnapshot {
            vector_store_ready: true,
            num_total_chunks: 57,
            num_indexed_documents: 2,
            llm_model: "gpt-4".to_string(),
            embedding_model: "minilm".to_string(),
        };
        update(&mut app, Action::HealthRefreshed(first));
        update(&mut app, Action::HealthRefreshed(second.clone()));
        assert_eq!(app.health, Some(second));
    }
}
