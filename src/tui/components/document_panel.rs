//! # DocumentPanel Component
//!
//! Sidebar listing the backend's indexed documents, with upload progress and
//! transient notifications. Entries are numbered so `/delete <n>` can refer
//! to them.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Wrap};

use crate::api::Document;
use crate::core::state::{MAX_UPLOAD_MB, Notification, NotificationKind, UploadProgress};
use crate::tui::component::Component;

/// Width of the textual progress bar, in cells.
const PROGRESS_BAR_WIDTH: usize = 20;

pub struct DocumentPanel<'a> {
    pub documents: &'a [Document],
    pub upload: Option<&'a UploadProgress>,
    pub notification: Option<&'a Notification>,
}

impl<'a> DocumentPanel<'a> {
    pub fn new(
        documents: &'a [Document],
        upload: Option<&'a UploadProgress>,
        notification: Option<&'a Notification>,
    ) -> Self {
        Self {
            documents,
            upload,
            notification,
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = Vec::new();

        if let Some(upload) = self.upload {
            lines.push(Line::from(Span::styled(
                format!("Indexing {}", upload.filename),
                Style::default().fg(Color::Yellow),
            )));
            lines.push(Line::from(Span::styled(
                progress_bar(upload.percent),
                Style::default().fg(Color::Yellow),
            )));
            lines.push(Line::default());
        }

        if let Some(notification) = self.notification {
            let style = match notification.kind {
                NotificationKind::Success => Style::default().fg(Color::Green),
                NotificationKind::Error => Style::default().fg(Color::Red),
            };
            lines.push(Line::from(Span::styled(notification.text.clone(), style)));
            lines.push(Line::default());
        }

        if self.documents.is_empty() {
            if self.upload.is_none() {
                lines.push(Line::from(Span::styled("No documents indexed", dim)));
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    format!("PDF, TXT, MD, DOCX up to {MAX_UPLOAD_MB}MB"),
                    dim,
                )));
                lines.push(Line::from(Span::styled("/upload <path>", dim)));
            }
            return lines;
        }

        for (i, doc) in self.documents.iter().enumerate() {
            lines.push(Line::from(Span::raw(format!("{}. {}", i + 1, doc.filename))));
            lines.push(Line::from(Span::styled(
                format!(
                    "   {} chunks · {}",
                    doc.num_chunks,
                    format_size(doc.size_bytes)
                ),
                dim,
            )));
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("/upload · /delete <n>", dim)));
        lines
    }
}

impl Component for DocumentPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = format!("Documents ({})", self.documents.len());
        let block = Block::bordered()
            .title(title)
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM))
            .padding(Padding::horizontal(1));

        let panel = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(panel, area);
    }
}

fn progress_bar(percent: u8) -> String {
    let filled = (percent as usize * PROGRESS_BAR_WIDTH) / 100;
    format!(
        "{}{} {percent}%",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

/// Human-readable file size, one decimal place above bytes.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f >= MB {
        format!("{:.1} MB", bytes_f / MB)
    } else if bytes_f >= KB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{bytes} B")
    }
}
