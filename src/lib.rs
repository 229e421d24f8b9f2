//! # ragchat
//!
//! Terminal client for a document question-answering backend. Upload
//! documents into the backend's vector index, ask questions about them, and
//! read answers with their source citations, all without leaving the
//! terminal.
//!
//! The crate follows a unidirectional data flow: terminal events become
//! [`core::action::Action`] values, a pure `update` function mutates
//! [`core::state::App`] and returns an `Effect`, and the TUI layer performs
//! the described I/O on background tasks that feed actions back in.

pub mod api;
pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;
