//! # TranscriptView Component
//!
//! Scrollable view of the conversation transcript.
//!
//! `TranscriptView` is a transient component (created each frame) that wraps
//! `&'a mut TranscriptViewState` (persistent scroll state) and the transcript
//! itself (props). Heights are recomputed per frame from the same paragraphs
//! the render pass uses, so scroll math always matches what is on screen.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::Transcript;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageBubble;
use crate::tui::event::TuiEvent;

/// Scroll state for the transcript. Must be persisted in the parent TuiState.
pub struct TranscriptViewState {
    pub scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content.
    pub stick_to_bottom: bool,
    /// Whether source citations are expanded on assistant messages.
    pub sources_expanded: bool,
    /// Last known content height (for scroll clamping between frames).
    content_height: u16,
    /// Last known viewport height.
    viewport_height: u16,
}

impl Default for TranscriptViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptViewState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true, // Start attached to bottom
            sources_expanded: false,
            content_height: 0,
            viewport_height: 0,
        }
    }

    pub fn toggle_sources(&mut self) {
        self.sources_expanded = !self.sources_expanded;
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll if the user has scrolled back to the bottom.
    fn repin_if_at_bottom(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        if self.scroll_state.offset().y >= max_y {
            self.stick_to_bottom = true;
        }
    }
}

impl EventHandler for TranscriptViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Sums bubble heights without overflowing `u16` on very long transcripts;
/// anything past `u16::MAX` rows is unreachable by the scroll view anyway.
fn total_content_height(heights: &[u16]) -> u16 {
    let total: u32 = heights.iter().map(|h| u32::from(*h)).sum();
    total.min(u32::from(u16::MAX)) as u16
}

/// Scrollable conversation view. Created fresh each frame.
pub struct TranscriptView<'a> {
    pub state: &'a mut TranscriptViewState,
    pub transcript: &'a Transcript,
    pub spinner_frame: usize,
}

impl<'a> TranscriptView<'a> {
    pub fn new(
        state: &'a mut TranscriptViewState,
        transcript: &'a Transcript,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            transcript,
            spinner_frame,
        }
    }
}

impl Component for TranscriptView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar

        let bubbles: Vec<MessageBubble> = self
            .transcript
            .messages()
            .iter()
            .map(|m| MessageBubble::new(m, self.state.sources_expanded, self.spinner_frame))
            .collect();
        let heights: Vec<u16> = bubbles
            .iter()
            .map(|b| b.calculate_height(content_width))
            .collect();
        let total_height = total_content_height(&heights);

        self.state.content_height = total_height;
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for (bubble, height) in bubbles.into_iter().zip(&heights) {
            let bubble_rect = Rect::new(0, y_offset, content_width, *height);
            scroll_view.render_widget(bubble, bubble_rect);
            y_offset = y_offset.saturating_add(*height);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
