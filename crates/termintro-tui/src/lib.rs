//! termintro-tui: Terminal UI for the typed terminal intro
//!
//! This crate provides the TUI layer for termintro, including:
//! - The intro screen (terminal card, typed lines, blinking cursor)
//! - Input mapping from clicks and keys to skip
//! - Headless mode for testing and automation

mod app;
mod event;
pub mod headless;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::App;
pub use event::{key_to_action, mouse_to_action, Action, Event, EventHandler};
pub use termintro_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use termintro_engine::{Completion, IntroConfig, PlaybackState};
use tokio::sync::watch;
use tracing::info;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Play the intro in the terminal.
///
/// Sets up the terminal, runs the event loop until the intro is dismissed
/// or quit, and restores the terminal on exit. Returns how the intro ended,
/// or `None` if the user quit.
pub async fn run_tui(
    config: &IntroConfig,
    seed: Option<u64>,
) -> Result<Option<Completion>, Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let mut app = App::new(config, seed);
    let Some(mut changes) = app.subscribe() else {
        return Ok(None);
    };

    // 4 Hz tick; redraws are driven by playback changes
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events, &mut changes).await;
    app.close();

    terminal.show_cursor()?;

    let completion = result?;
    if let Some(completion) = completion {
        info!(%completion, "intro finished");
    }
    Ok(completion)
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    changes: &mut watch::Receiver<PlaybackState>,
) -> Result<Option<Completion>, Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            screens::intro::IntroScreen.render(app, frame.area(), frame.buffer_mut());
        })?;

        if app.should_quit {
            return Ok(None);
        }
        if app.is_dismissed() {
            return Ok(app.completion());
        }

        tokio::select! {
            event = events.next() => match event {
                Some(Event::Key(key)) => app.handle_action(key_to_action(key)),
                Some(Event::Mouse(mouse)) => app.handle_action(mouse_to_action(mouse)),
                // Terminal will handle resize on the next draw
                Some(Event::Tick | Event::Resize(_, _)) => {}
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
}

/// Returns the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
