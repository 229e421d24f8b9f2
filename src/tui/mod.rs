//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm. The core
//! stays a pure state machine; every network call described by an `Effect`
//! is spawned here as a tokio task that reports back over an action channel.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (typing indicator, upload progress, live notification):
//!   draws every ~120ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous
//! redraws.

pub mod component;
pub mod components;
pub mod event;
pub mod markdown;
mod ui;

use std::io::stdout;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info, warn};
use tokio::task::AbortHandle;

use crate::api::{AskRequest, DocQaBackend, HistoryEntry, HttpBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, TranscriptViewState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub transcript_view: TranscriptViewState,
    pub input_box: InputBox,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            transcript_view: TranscriptViewState::new(),
            input_box: InputBox::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

/// Periodic health refresh with an explicit lifecycle. `start` spawns the
/// polling task (which also fires immediately, covering startup); `stop`
/// aborts it. Dropping the poller stops it too, so the loop can't leak past
/// the TUI session.
pub struct HealthPoller {
    handle: Option<AbortHandle>,
}

impl HealthPoller {
    pub fn start(
        backend: Arc<dyn DocQaBackend>,
        interval: Duration,
        tx: mpsc::Sender<Action>,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match backend.health().await {
                    Ok(snapshot) => {
                        if tx.send(Action::HealthRefreshed(snapshot)).is_err() {
                            return;
                        }
                    }
                    // The poller survives failures; the status bar just goes stale.
                    Err(e) => warn!("Health check failed: {e}"),
                }
            }
        });
        Self {
            handle: Some(task.abort_handle()),
        }
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Health poller stopped");
        }
    }
}

impl Drop for HealthPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn DocQaBackend> = Arc::new(
        HttpBackend::new(config.base_url.clone(), config.timeout).map_err(std::io::Error::other)?,
    );
    let mut app = App::from_config(backend.clone(), &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    spawn_document_load(backend.clone(), tx.clone());
    let mut health_poller =
        HealthPoller::start(backend.clone(), config.health_poll_interval, tx.clone());

    // Animation timer
    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        // Sync InputBox props with App state
        tui.input_box.is_loading = app.is_loading;
        tui.input_box.docs_empty = app.documents.is_empty();

        let animating = app.is_loading || app.upload.is_some() || app.notification.is_some();
        if animating {
            needs_redraw = true;
        }
        if app.expire_notification() {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            let spinner_frame = (elapsed * 4.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating, long when idle
        let timeout = if animating {
            Duration::from_millis(120)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                // Resize just needs a redraw (already flagged above)
                TuiEvent::Resize => {}

                TuiEvent::ForceQuit => {
                    let effect = update(&mut app, Action::Quit);
                    should_quit |= run_effect(&app, effect, &tx);
                }

                TuiEvent::ClearChat => {
                    let effect = update(&mut app, Action::ClearChat);
                    should_quit |= run_effect(&app, effect, &tx);
                    tui.transcript_view = TranscriptViewState::new();
                }

                TuiEvent::ToggleSources => {
                    tui.transcript_view.toggle_sources();
                }

                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.transcript_view.handle_event(&event);
                }

                // Everything else belongs to the input box
                _ => {
                    if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
                        let effect = update(&mut app, Action::Submit(text));
                        should_quit |= run_effect(&app, effect, &tx);
                    }
                }
            }
        }

        // Handle background task actions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {action:?}");
            let effect = update(&mut app, action);
            should_quit |= run_effect(&app, effect, &tx);
        }

        if should_quit {
            break;
        }
    }

    health_poller.stop();
    ratatui::restore();
    Ok(())
}

/// Perform the I/O an update asked for. Returns true when the loop should exit.
fn run_effect(app: &App, effect: Effect, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::SpawnAsk {
            question,
            history,
            top_k,
        } => {
            spawn_ask(app.backend.clone(), question, history, top_k, tx.clone());
            false
        }
        Effect::RefreshHealth => {
            spawn_health_refresh(app.backend.clone(), tx.clone());
            false
        }
        Effect::SpawnUpload { paths } => {
            spawn_upload_batch(app.backend.clone(), paths, tx.clone());
            false
        }
        Effect::SpawnDelete { doc_id } => {
            spawn_delete(app.backend.clone(), doc_id, tx.clone());
            false
        }
    }
}

fn spawn_ask(
    backend: Arc<dyn DocQaBackend>,
    question: String,
    history: Vec<HistoryEntry>,
    top_k: u32,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning ask request ({} history entries)", history.len());
    tokio::spawn(async move {
        let request = AskRequest {
            question,
            conversation_history: history,
            top_k,
        };
        let action = match backend.ask(request).await {
            Ok(response) => Action::AnswerReceived(response),
            Err(e) => Action::AskFailed(format!("Error: {e}")),
        };
        if tx.send(action).is_err() {
            warn!("Failed to send ask result: receiver dropped");
        }
    });
}

fn spawn_health_refresh(backend: Arc<dyn DocQaBackend>, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        match backend.health().await {
            Ok(snapshot) => {
                let _ = tx.send(Action::HealthRefreshed(snapshot));
            }
            Err(e) => warn!("Health refresh failed: {e}"),
        }
    });
}

fn spawn_document_load(backend: Arc<dyn DocQaBackend>, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        match backend.list_documents().await {
            Ok(documents) => {
                let _ = tx.send(Action::DocumentsLoaded(documents));
            }
            Err(e) => warn!("Document list failed: {e}"),
        }
    });
}

fn spawn_upload_batch(
    backend: Arc<dyn DocQaBackend>,
    paths: Vec<PathBuf>,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning upload of {} file(s)", paths.len());
    tokio::spawn(upload_batch(backend, paths, tx));
}

/// Uploads files one at a time so the panel shows a single progress bar and
/// one outcome per file; a failure does not stop the rest of the batch.
async fn upload_batch(
    backend: Arc<dyn DocQaBackend>,
    paths: Vec<PathBuf>,
    tx: mpsc::Sender<Action>,
) {
    for path in paths {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if tx
            .send(Action::UploadStarted {
                filename: filename.clone(),
            })
            .is_err()
        {
            return;
        }

        // Forward byte-level progress into the action channel while the
        // request body streams out.
        let (progress_tx, mut progress_rx) = tokio::sync::mpsc::unbounded_channel();
        let forward_tx = tx.clone();
        let forward_name = filename.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(percent) = progress_rx.recv().await {
                if forward_tx
                    .send(Action::UploadProgressed {
                        filename: forward_name.clone(),
                        percent,
                    })
                    .is_err()
                {
                    return;
                }
            }
        });

        let action = match backend.upload_document(&path, progress_tx).await {
            Ok(document) => {
                info!(
                    "Indexed {} as {} ({} chunks)",
                    filename, document.doc_id, document.num_chunks
                );
                Action::DocumentIndexed(document)
            }
            Err(e) => {
                warn!("Upload of {filename} failed: {e}");
                Action::UploadFailed {
                    filename,
                    message: e.to_string(),
                }
            }
        };
        let _ = forwarder.await;
        if tx.send(action).is_err() {
            return;
        }
    }
}

fn spawn_delete(backend: Arc<dyn DocQaBackend>, doc_id: String, tx: mpsc::Sender<Action>) {
    info!("Spawning delete of document {doc_id}");
    tokio::spawn(async move {
        let action = match backend.delete_document(&doc_id).await {
            Ok(response) => Action::DocumentDeleted {
                doc_id: response.doc_id,
            },
            Err(e) => Action::DeleteFailed {
                message: e.to_string(),
            },
        };
        if tx.send(action).is_err() {
            warn!("Failed to send delete result: receiver dropped");
        }
    });
}
