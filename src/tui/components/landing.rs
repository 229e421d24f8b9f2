//! # Landing Component
//!
//! Centered welcome text shown in the chat area while the transcript is empty.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

/// Example questions shown once documents are indexed.
const STARTER_PROMPTS: [&str; 3] = [
    "\"Summarize the key findings\"",
    "\"What does the report say about costs?\"",
    "\"Which document mentions deadlines?\"",
];

pub struct Landing {
    pub docs_empty: bool,
}

impl Landing {
    pub fn new(docs_empty: bool) -> Self {
        Self { docs_empty }
    }
}

impl Component for Landing {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let hint = if self.docs_empty {
            "Upload a document to get started: /upload <path>"
        } else {
            "Ask a question about your documents"
        };

        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = vec![
            Line::from(Span::styled(
                "ragchat",
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!("v{}", env!("CARGO_PKG_VERSION")), dim)),
            Line::default(),
            Line::from(Span::styled(hint, dim)),
        ];
        if !self.docs_empty {
            for prompt in STARTER_PROMPTS {
                lines.push(Line::from(Span::styled(prompt, dim)));
            }
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Ctrl+L clears the chat · Ctrl+C quits",
            dim,
        )));

        let text_height = lines.len() as u16;
        let [centered] = Layout::vertical([Constraint::Length(text_height)])
            .flex(Flex::Center)
            .areas(area);

        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, centered);
    }
}
