//! # TUI Components
//!
//! Components follow two patterns:
//!
//! - **Stateless (props-based)**: created fresh each frame with the data they
//!   need (`StatusBar`, `DocumentPanel`, `MessageBubble`, `Landing`).
//! - **Stateful (event-driven)**: hold or wrap persistent state and handle
//!   events (`InputBox`, `TranscriptView` around `TranscriptViewState`).
//!
//! Each component file co-locates its state types, event types, rendering,
//! and tests.

pub mod document_panel;
pub mod input_box;
pub mod landing;
pub mod message;
pub mod status_bar;
pub mod transcript_view;

pub use document_panel::DocumentPanel;
pub use input_box::{InputBox, InputEvent};
pub use landing::Landing;
pub use message::MessageBubble;
pub use status_bar::StatusBar;
pub use transcript_view::{TranscriptView, TranscriptViewState};
