use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::core::transcript::{ChatMessage, ResponseMeta};
use crate::tui::component::Component;
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Typing indicator animation frames for the pending placeholder.
const TYPING_FRAMES: [&str; 3] = ["●∙∙", "∙●∙", "∙∙●"];

/// Max excerpt lines shown per source when citations are expanded.
const EXCERPT_LINES: usize = 3;

/// A transient component rendering a single transcript entry.
///
/// Created fresh each frame with the data it needs. Styling per variant:
/// - **User** (green): raw text, no markdown
/// - **Pending** (blue, dim border): animated typing dots
/// - **Assistant** (blue): markdown content, a metadata row, and an optional
///   source-citation footer
/// - **Failed** (red): the error message
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a ChatMessage,
    /// Whether source citations are expanded to show excerpts.
    pub sources_expanded: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a ChatMessage, sources_expanded: bool, spinner_frame: usize) -> Self {
        Self {
            message,
            sources_expanded,
            spinner_frame,
        }
    }

    /// Height this bubble needs at the given total width.
    ///
    /// Builds the same paragraph as the render path and asks ratatui for its
    /// wrapped line count, so calculated and actual heights always agree.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding. Still occupy a row.
            return 1;
        }
        let paragraph = self.paragraph(content_width);
        (paragraph.line_count(content_width) as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn role(&self) -> &'static str {
        match self.message {
            ChatMessage::User { .. } => "you",
            ChatMessage::Pending | ChatMessage::Assistant { .. } => "assistant",
            ChatMessage::Failed { .. } => "error",
        }
    }

    fn base_style(&self) -> Style {
        match self.message {
            ChatMessage::User { .. } => Style::default().fg(Color::Green),
            ChatMessage::Pending | ChatMessage::Assistant { .. } => {
                Style::default().fg(Color::Blue)
            }
            ChatMessage::Failed { .. } => Style::default().fg(Color::Red),
        }
    }

    fn paragraph(&self, content_width: u16) -> Paragraph<'static> {
        Paragraph::new(self.lines(content_width))
            .style(self.base_style())
            .wrap(Wrap { trim: false })
    }

    fn lines(&self, content_width: u16) -> Vec<Line<'static>> {
        match self.message {
            ChatMessage::User { content } => content
                .lines()
                .map(|l| Line::from(l.to_owned()))
                .collect(),

            ChatMessage::Pending => {
                let dots = TYPING_FRAMES[self.spinner_frame % TYPING_FRAMES.len()];
                vec![Line::from(Span::styled(
                    dots.to_owned(),
                    Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
                ))]
            }

            ChatMessage::Assistant {
                content,
                sources,
                meta,
            } => {
                let mut lines = markdown::render(content, Color::Blue).lines;
                lines.push(Line::default());
                lines.push(meta_line(meta));
                if !sources.is_empty() {
                    lines.extend(self.source_lines(sources, content_width));
                }
                lines
            }

            ChatMessage::Failed { content } => content
                .lines()
                .map(|l| Line::from(l.to_owned()))
                .collect(),
        }
    }

    fn source_lines(
        &self,
        sources: &[crate::api::SourceChunk],
        content_width: u16,
    ) -> Vec<Line<'static>> {
        let dim = Style::default().fg(Color::DarkGray);
        let accent = Style::default().fg(Color::Cyan);
        let noun = if sources.len() == 1 { "source" } else { "sources" };

        if !self.sources_expanded {
            return vec![Line::from(Span::styled(
                format!("▸ {} {noun} (Ctrl+O to expand)", sources.len()),
                accent,
            ))];
        }

        let mut lines = vec![Line::from(Span::styled(
            format!("▾ {} {noun}", sources.len()),
            accent,
        ))];
        for source in sources {
            lines.push(Line::from(Span::styled(
                format!(
                    "{} · chunk {} · {:.0}%",
                    source.filename,
                    source.chunk_index,
                    source.relevance_score * 100.0
                ),
                accent.add_modifier(Modifier::BOLD),
            )));
            // Pre-wrapped excerpt clamped to a few lines, like a preview.
            let wrap_width = (content_width as usize).max(1);
            for wrapped in textwrap::wrap(source.content.trim(), wrap_width)
                .into_iter()
                .take(EXCERPT_LINES)
            {
                lines.push(Line::from(Span::styled(wrapped.into_owned(), dim)));
            }
        }
        lines
    }
}

fn meta_line(meta: &ResponseMeta) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let text = if meta.tokens_used > 0 {
        format!(
            "{}ms · {} tokens · {}",
            meta.response_time_ms, meta.tokens_used, meta.model_used
        )
    } else {
        format!("{}ms · {}", meta.response_time_ms, meta.model_used)
    };
    Line::from(Span::styled(text, dim))
}

impl Widget for MessageBubble<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = self.base_style();
        let border_style = if matches!(self.message, ChatMessage::Pending) {
            style.add_modifier(Modifier::DIM)
        } else {
            style
        };

        let block = Block::bordered()
            .title(self.role())
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        self.paragraph(inner_area.width).render(inner_area, buf);
    }
}

impl Component for MessageBubble<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
