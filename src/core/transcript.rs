//! # Transcript
//!
//! The ordered conversation between user and assistant. This is the one
//! piece of state with real invariants:
//!
//! - at most one [`ChatMessage::Pending`] placeholder exists at a time, and
//!   while present it is the last element;
//! - finalized messages are immutable; the placeholder is *replaced* by a
//!   resolved or failed message, never edited in place.
//!
//! The placeholder lifecycle is a tagged state transition
//! (`Pending → Assistant | Failed`) rather than a boolean flag on a generic
//! message, so "at most one pending" is visible in the type.

use crate::api::{AskResponse, HistoryEntry, Role, SourceChunk};

/// Inference metadata attached to a resolved assistant message.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMeta {
    pub model_used: String,
    pub tokens_used: u32,
    pub response_time_ms: u64,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessage {
    User {
        content: String,
    },
    /// Typing placeholder: a response not yet received.
    Pending,
    Assistant {
        content: String,
        sources: Vec<SourceChunk>,
        meta: ResponseMeta,
    },
    /// An exchange that ended in an error; rendered as an inline error bubble.
    Failed {
        content: String,
    },
}

impl ChatMessage {
    pub fn is_pending(&self) -> bool {
        matches!(self, ChatMessage::Pending)
    }

    /// The `{role, content}` reduction sent as conversation history.
    /// Pending placeholders have no content and are never part of history.
    fn history_entry(&self) -> Option<HistoryEntry> {
        match self {
            ChatMessage::User { content } => Some(HistoryEntry {
                role: Role::User,
                content: content.clone(),
            }),
            ChatMessage::Assistant { content, .. } | ChatMessage::Failed { content } => {
                Some(HistoryEntry {
                    role: Role::Assistant,
                    content: content.clone(),
                })
            }
            ChatMessage::Pending => None,
        }
    }
}

/// Ordered message sequence with single-writer semantics (owned by `App`).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(ChatMessage::is_pending)
    }

    /// The most recent `limit` finalized messages, oldest first, reduced to
    /// `{role, content}`.
    pub fn history(&self, limit: usize) -> Vec<HistoryEntry> {
        let mut entries: Vec<HistoryEntry> = self
            .messages
            .iter()
            .rev()
            .filter_map(ChatMessage::history_entry)
            .take(limit)
            .collect();
        entries.reverse();
        entries
    }

    /// Appends the user's question followed by the typing placeholder.
    /// Callers must not start an exchange while one is in flight.
    pub fn begin_exchange(&mut self, question: String) {
        debug_assert!(!self.has_pending(), "exchange started while one is pending");
        self.messages.push(ChatMessage::User { content: question });
        self.messages.push(ChatMessage::Pending);
    }

    /// Replaces the placeholder with the finalized assistant answer.
    pub fn resolve_pending(&mut self, response: AskResponse) {
        let message = ChatMessage::Assistant {
            content: response.answer,
            sources: response.sources,
            meta: ResponseMeta {
                model_used: response.model_used,
                tokens_used: response.tokens_used.unwrap_or(0),
                response_time_ms: response.response_time_ms,
            },
        };
        self.replace_pending(message);
    }

    /// Replaces the placeholder with an inline error bubble.
    pub fn fail_pending(&mut self, message: String) {
        self.replace_pending(ChatMessage::Failed { content: message });
    }

    fn replace_pending(&mut self, message: ChatMessage) {
        self.messages.retain(|m| !m.is_pending());
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str) -> AskResponse {
        AskResponse {
            answer: text.to_string(),
            sources: vec![],
            model_used: "gpt-4".to_string(),
            tokens_used: Some(42),
            response_time_ms: 800,
        }
    }

    fn pending_count(t: &Transcript) -> usize {
        t.messages().iter().filter(|m| m.is_pending()).count()
    }

    #[test]
    fn test_begin_exchange_appends_user_then_placeholder() {
        let mut t = Transcript::new();
        t.begin_exchange("What is X?".to_string());

        assert_eq!(t.len(), 2);
        assert_eq!(
            t.messages()[0],
            ChatMessage::User {
                content: "What is X?".to_string()
            }
        );
        assert!(t.messages()[1].is_pending());
    }

    #[test]
    fn test_placeholder_is_always_last_and_unique() {
        let mut t = Transcript::new();
        t.begin_exchange("one".to_string());
        assert_eq!(pending_count(&t), 1);
        assert!(t.messages().last().unwrap().is_pending());

        t.resolve_pending(answer("first"));
        t.begin_exchange("two".to_string());
        assert_eq!(pending_count(&t), 1);
        assert!(t.messages().last().unwrap().is_pending());
    }

    #[test]
    fn test_resolve_pending_replaces_placeholder() {
        let mut t = Transcript::new();
        t.begin_exchange("What is X?".to_string());
        t.resolve_pending(answer("X is Y"));

        assert_eq!(pending_count(&t), 0);
        assert_eq!(t.len(), 2);
        match t.messages().last().unwrap() {
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
    fn test_fail_pending_replaces_placeholder_with_error() {
        let mut t = Transcript::new();
        t.begin_exchange("What is X?".to_string());
        t.fail_pending("Error: No documents indexed".to_string());

        assert_eq!(pending_count(&t), 0);
        match t.messages().last().unwrap() {
            ChatMessage::Failed { content } => {
                assert!(content.contains("No documents indexed"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_history_excludes_placeholder() {
        let mut t = Transcript::new();
        t.begin_exchange("question".to_string());

        let history = t.history(10);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "question");
    }

    #[test]
    fn test_history_is_bounded_and_ordered() {
        let mut t = Transcript::new();
        for i in 0..8 {
            t.begin_exchange(format!("q{i}"));
            t.resolve_pending(answer(&format!("a{i}")));
        }
        // 16 finalized messages total; only the most recent 10 survive.
        let history = t.history(10);
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].content, "q3");
        assert_eq!(history[9].content, "a7");

        // Oldest first within the window.
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
        }
    }

    #[test]
    fn test_history_includes_failed_exchanges_as_assistant() {
        let mut t = Transcript::new();
        t.begin_exchange("q".to_string());
        t.fail_pending("Error: timeout".to_string());

        let history = t.history(10);
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[1].content, "Error: timeout");
    }

    #[test]
    fn test_clear_empties_transcript() {
        let mut t = Transcript::new();
        t.begin_exchange("q".to_string());
        t.resolve_pending(answer("a"));
        t.clear();
        assert!(t.is_empty());
        assert!(t.history(10).is_empty());
    }

    #[test]
    fn test_tokens_used_defaults_to_zero_when_absent() {
        let mut t = Transcript::new();
        t.begin_exchange("q".to_string());
        let mut res = answer("a");
        res.tokens_used = None;
        t.resolve_pending(res);
        match t.messages().last().unwrap() {
            ChatMessage::Assistant { meta, .. } => assert_eq!(meta.tokens_used, 0),
            other => panic!("expected Assistant, got {other:?}"),
        }
    }
}
