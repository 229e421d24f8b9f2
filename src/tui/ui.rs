use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Span;

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{DocumentPanel, Landing, StatusBar, TranscriptView};

/// Width of the document sidebar.
const PANEL_WIDTH: u16 = 34;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let layout = Layout::vertical([Length(1), Length(1), Min(0), Length(3)]);
    let [title_area, status_area, main_area, input_area] = layout.areas(frame.area());

    let [panel_area, chat_area] =
        Layout::horizontal([Length(PANEL_WIDTH), Min(0)]).areas(main_area);

    // Title bar
    let title_text = if app.status_message.is_empty() {
        "ragchat".to_string()
    } else {
        format!("ragchat | {}", app.status_message)
    };
    frame.render_widget(
        Span::styled(title_text, Style::default().fg(Color::Blue)),
        title_area,
    );

    StatusBar::new(app.health.as_ref()).render(frame, status_area);

    DocumentPanel::new(
        &app.documents,
        app.upload.as_ref(),
        app.notification.as_ref(),
    )
    .render(frame, panel_area);

    if app.transcript.is_empty() {
        Landing::new(app.documents.is_empty()).render(frame, chat_area);
    } else {
        TranscriptView::new(&mut tui.transcript_view, &app.transcript, spinner_frame)
            .render(frame, chat_area);
    }

    tui.input_box.render(frame, input_area);
}
