use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::{error, info};
use ratatui::layout::{Position, Rect};
use ratatui::style::Color;
use tokio::task::JoinHandle;

use apod_core::{
    FeedError, FeedLoader, FeedSnapshot, GestureRecognizer, ItemView, ModalView, RenderTarget,
    ShuffleSequencer, ViewerController,
};

use crate::embed::TerminalEmbedProvider;
use crate::facts::FactRotation;

/// Approximate pixel width of one terminal cell, used to scale mouse drags
/// onto the gesture recognizer's pixel thresholds.
const CELL_PX: f32 = 8.0;

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(4);

/// What the gallery area currently shows.
#[derive(Debug, Default)]
pub enum Screen {
    /// Before the first load: invites the user to trigger it.
    #[default]
    Welcome,
    Loading,
    Error(String),
    Item(ItemView),
}

/// Render-target state the draw loop reads.
///
/// The controller writes instructions here; ratatui redraws every tick from
/// whatever is current.
#[derive(Debug, Default)]
pub struct Surface {
    pub screen: Screen,
    pub modal: Option<ModalView>,
    /// Area the modal content occupied on the last draw. Clicks outside it
    /// (on the overlay background) dismiss the modal.
    pub modal_area: Option<Rect>,
}

impl RenderTarget for Surface {
    fn show_loading(&mut self) {
        self.screen = Screen::Loading;
    }

    fn show_error(&mut self, message: &str) {
        self.screen = Screen::Error(message.to_string());
    }

    fn show_item(&mut self, view: ItemView) {
        self.screen = Screen::Item(view);
    }

    fn open_modal(&mut self, view: ModalView) {
        self.modal = Some(view);
    }

    fn close_modal(&mut self) {
        self.modal = None;
        self.modal_area = None;
    }
}

// App state
pub struct App {
    /// The orchestrating controller from apod-core.
    pub viewer: ViewerController<Surface, TerminalEmbedProvider>,
    /// Feed loader with generation tracking for stale results.
    pub loader: FeedLoader,
    /// In-flight feed load, applied from [`App::tick`] so the draw loop keeps
    /// running (and the loading indicator stays visible) while it runs.
    pending_load: Option<(u64, JoinHandle<Result<FeedSnapshot, FeedError>>)>,
    /// "Did you know" rotation shown under the gallery.
    pub facts: FactRotation,
    /// Mouse-as-touch gesture recognizer.
    gestures: GestureRecognizer,
    /// Monotonic clock origin for gesture timestamps.
    started: Instant,
    /// Status message to display
    pub status_message: Option<(String, Instant, Color)>,
    /// Help dialog visibility
    pub show_help: bool,
    /// Whether the app should exit
    pub should_quit: bool,
}

impl App {
    pub fn new(feed_url: String, seed: Option<u64>) -> Self {
        let sequencer = match seed {
            Some(seed) => ShuffleSequencer::from_seed(seed),
            None => ShuffleSequencer::new(),
        };
        Self {
            viewer: ViewerController::with_sequencer(
                Surface::default(),
                TerminalEmbedProvider,
                sequencer,
            ),
            loader: FeedLoader::new(feed_url),
            pending_load: None,
            facts: FactRotation::new(),
            gestures: GestureRecognizer::new(),
            started: Instant::now(),
            status_message: None,
            show_help: false,
            should_quit: false,
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn set_status(&mut self, message: impl Into<String>, color: Color) {
        self.status_message = Some((message.into(), Instant::now(), color));
    }

    /// Kick off a load: loading indicator now, fetch in the background. The
    /// result lands in [`App::tick`]; a result from a superseded generation
    /// is discarded there instead of applied. Re-triggering while a load is
    /// in flight drops the old task's result.
    pub fn reload(&mut self) {
        self.viewer.show_loading();
        let token = self.loader.begin();
        let loader = self.loader.clone();
        self.pending_load = Some((token, tokio::spawn(async move { loader.load().await })));
    }

    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Global quit keys
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') => {
                if self.viewer.is_modal_open() {
                    self.viewer.close_modal();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Esc => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    // No-op when nothing is open.
                    self.viewer.close_modal();
                }
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('n') | KeyCode::Char('l') | KeyCode::Right => {
                self.viewer.advance().await;
            }
            KeyCode::Char('p') | KeyCode::Char('h') | KeyCode::Left => {
                self.viewer.retreat().await;
            }
            KeyCode::Enter | KeyCode::Char('o') => {
                if self.viewer.is_empty() {
                    self.set_status("Nothing to open yet - press r to load the feed", Color::Yellow);
                } else {
                    let index = self.viewer.current_index();
                    self.viewer.open_modal(index).await;
                }
            }
            KeyCode::Char(' ') => self.viewer.toggle_modal_playback(),
            KeyCode::Char('f') => {
                self.facts.pick();
            }
            KeyCode::Char('?') => self.show_help = !self.show_help,
            _ => {}
        }

        Ok(())
    }

    /// Mouse input doubles as the touch surface: presses and drags feed the
    /// gesture recognizer, scaled from cells to approximate pixels. Cells
    /// are roughly twice as tall as wide, hence the vertical factor.
    pub async fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<()> {
        let x = mouse.column as f32 * CELL_PX;
        let y = mouse.row as f32 * CELL_PX * 2.0;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // A click on the overlay background (outside the modal
                // content) dismisses the modal.
                if self.viewer.is_modal_open() {
                    if let Some(area) = self.viewer.target().modal_area {
                        if !area.contains(Position::new(mouse.column, mouse.row)) {
                            self.viewer.close_modal();
                            return Ok(());
                        }
                    }
                }
                self.gestures.touch_start(x, y);
            }
            MouseEventKind::Drag(MouseButton::Left) => self.gestures.touch_move(x, y),
            MouseEventKind::Up(MouseButton::Left) => {
                let at = self.now_ms();
                if let Some(gesture) = self.gestures.touch_end(x, y, at) {
                    self.viewer.on_gesture(gesture).await;
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Periodic tick: apply a finished feed load, flush deferred taps and
    /// expire the status line.
    pub async fn tick(&mut self) {
        if self
            .pending_load
            .as_ref()
            .is_some_and(|(_, handle)| handle.is_finished())
        {
            if let Some((token, handle)) = self.pending_load.take() {
                match handle.await {
                    Ok(outcome) if self.loader.is_current(token) => {
                        self.viewer.apply_load(outcome);
                    }
                    Ok(_) => info!("Discarding stale feed load (generation {})", token),
                    Err(e) => {
                        error!("Feed load task failed: {}", e);
                        self.viewer.target_mut().show_error("Unable to load images.");
                    }
                }
            }
        }

        if let Some(gesture) = self.gestures.poll(self.now_ms()) {
            self.viewer.on_gesture(gesture).await;
        }
        if let Some((_, shown, _)) = &self.status_message {
            if shown.elapsed() > STATUS_TTL {
                self.status_message = None;
            }
        }
    }
}
