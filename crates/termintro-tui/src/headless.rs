//! Headless mode for the termintro TUI.
//!
//! This module runs the intro without a real terminal, enabling end-to-end
//! testing. Actions are sent via a channel and the screen text is captured
//! after each render.

use crate::app::App;
use crate::event::Action;
use crate::screens::intro::IntroScreen;
use crate::screens::Screen as ScreenTrait;
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::time::Duration;
use termintro_engine::{Completion, ExitStage, IntroConfig, Phase};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// State captured from the headless TUI after each render.
#[derive(Debug, Clone)]
pub struct HeadlessState {
    /// Text contents of the terminal buffer.
    pub screen_contents: String,
    /// Typing phase of the player.
    pub phase: Phase,
    /// Exit stage of the player.
    pub exit: ExitStage,
    /// How the intro ended, once dismissed.
    pub completion: Option<Completion>,
    /// Whether the TUI should quit.
    pub should_quit: bool,
}

impl Default for HeadlessState {
    fn default() -> Self {
        Self {
            screen_contents: String::new(),
            phase: Phase::Typing,
            exit: ExitStage::Shown,
            completion: None,
            should_quit: false,
        }
    }
}

/// Handle to control a headless TUI instance.
pub struct HeadlessHandle {
    action_tx: mpsc::UnboundedSender<Action>,
    state_rx: watch::Receiver<HeadlessState>,
}

impl HeadlessHandle {
    /// Send an action to the TUI.
    ///
    /// Returns `true` if the action was sent successfully.
    pub fn send_action(&self, action: Action) -> bool {
        self.action_tx.send(action).is_ok()
    }

    /// Get the current state of the TUI.
    pub fn state(&self) -> HeadlessState {
        self.state_rx.borrow().clone()
    }

    /// Wait until a condition is met on the state.
    ///
    /// Returns the state when the condition is met, or `None` if timed out.
    pub async fn wait_for<F>(&mut self, condition: F, timeout: Duration) -> Option<HeadlessState>
    where
        F: Fn(&HeadlessState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let state = self.state();
            if condition(&state) {
                return Some(state);
            }

            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }

            match tokio::time::timeout(remaining, self.state_rx.changed()).await {
                Ok(Ok(())) => {}
                // sender gone: the loop exited, check the final state once more
                Ok(Err(_)) => {
                    let state = self.state();
                    return condition(&state).then_some(state);
                }
                Err(_) => return None,
            }
        }
    }

    /// Wait for specific text to appear on screen.
    pub async fn wait_for_text(&mut self, text: &str, timeout: Duration) -> Option<HeadlessState> {
        self.wait_for(|s| s.screen_contents.contains(text), timeout)
            .await
    }
}

/// Configuration for headless mode.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Terminal width.
    pub width: u16,
    /// Terminal height.
    pub height: u16,
    /// Jitter seed, for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: Some(0),
        }
    }
}

/// Run the intro in headless mode.
///
/// Returns a handle to control the TUI and a join handle resolving to the
/// completion, or `None` if the intro was quit.
pub fn run_tui_headless(
    intro: IntroConfig,
    config: HeadlessConfig,
) -> (HeadlessHandle, JoinHandle<Result<Option<Completion>, String>>) {
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(HeadlessState::default());

    let task = tokio::spawn(async move {
        run_headless_loop(intro, config, action_rx, state_tx)
            .await
            .map_err(|e| e.to_string())
    });

    let handle = HeadlessHandle {
        action_tx,
        state_rx,
    };

    (handle, task)
}

async fn run_headless_loop(
    intro: IntroConfig,
    config: HeadlessConfig,
    mut action_rx: mpsc::UnboundedReceiver<Action>,
    state_tx: watch::Sender<HeadlessState>,
) -> Result<Option<Completion>, Box<dyn std::error::Error + Send + Sync>> {
    let backend = TestBackend::new(config.width, config.height);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&intro, config.seed);
    let Some(mut changes) = app.subscribe() else {
        return Ok(None);
    };

    loop {
        terminal.draw(|frame| {
            IntroScreen.render(&app, frame.area(), frame.buffer_mut());
        })?;

        let _ = state_tx.send(HeadlessState {
            screen_contents: buffer_to_string(terminal.backend().buffer()),
            phase: app.state.phase,
            exit: app.state.exit,
            completion: app.completion(),
            should_quit: app.should_quit,
        });

        if app.should_quit || app.is_dismissed() {
            break;
        }

        tokio::select! {
            action = action_rx.recv() => match action {
                Some(action) => app.handle_action(action),
                None => app.handle_action(Action::Quit),
            },
            changed = changes.changed() => {
                if changed.is_err() {
                    app.handle_action(Action::Quit);
                }
            }
        }

        app.sync();
    }

    let completion = app.completion();
    app.close();
    Ok(completion)
}

/// Convert a terminal buffer to a string representation.
///
/// Trailing whitespace is trimmed from every row.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}
