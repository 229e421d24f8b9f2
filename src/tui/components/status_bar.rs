use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::api::HealthSnapshot;
use crate::tui::component::Component;

/// One-line backend status readout. Stays blank until the first health
/// snapshot arrives rather than guessing.
pub struct StatusBar<'a> {
    pub health: Option<&'a HealthSnapshot>,
}

impl<'a> StatusBar<'a> {
    pub fn new(health: Option<&'a HealthSnapshot>) -> Self {
        Self { health }
    }

    fn line(&self) -> Line<'static> {
        let dim = Style::default().fg(Color::DarkGray);
        let Some(health) = self.health else {
            return Line::default();
        };

        let (dot_style, label) = if health.vector_store_ready {
            (Style::default().fg(Color::Green), "Ready")
        } else {
            (Style::default().fg(Color::Yellow), "Waiting for index")
        };

        Line::from(vec![
            Span::styled("● ", dot_style),
            Span::raw(format!(
                "{label} · {} chunks · {} documents",
                health.num_total_chunks, health.num_indexed_documents
            )),
            Span::styled(
                format!(" · {} / {}", health.llm_model, health.embedding_model),
                dim,
            ),
        ])
    }
}

impl Component for StatusBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}
