//! Test utilities for termintro-tui rendering tests.
//!
//! This module provides helper functions for building apps in a fixed
//! playback state, rendering them, and converting buffers to strings.

use crate::app::App;
use crate::screens::intro::IntroScreen;
use crate::screens::Screen as ScreenTrait;
use ratatui::{buffer::Buffer, layout::Rect};

pub use crate::headless::buffer_to_string;
use termintro_engine::{PlaybackState, Script};

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test app showing the default script in the given state.
pub fn create_test_app(state: PlaybackState) -> App {
    create_test_app_with_script(state, Script::default())
}

/// Create a test app with a specific script.
pub fn create_test_app_with_script(state: PlaybackState, script: Script) -> App {
    App::new_for_test("sahil@dev:~", script, state)
}

/// Render the intro screen into a fresh buffer.
pub fn render_app_to_buffer(app: &App) -> Buffer {
    render_app_to_buffer_sized(app, TEST_WIDTH, TEST_HEIGHT)
}

/// Render the intro screen into a fresh buffer with custom dimensions.
pub fn render_app_to_buffer_sized(app: &App, width: u16, height: u16) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    IntroScreen.render(app, area, &mut buffer);
    buffer
}

/// Render the intro screen and return it as a string.
pub fn render_app_to_string(app: &App) -> String {
    buffer_to_string(&render_app_to_buffer(app))
}

/// Render the intro screen with custom dimensions and return it as a string.
pub fn render_app_to_string_sized(app: &App, width: u16, height: u16) -> String {
    buffer_to_string(&render_app_to_buffer_sized(app, width, height))
}

/// Position of the first cell holding `symbol`, scanning row by row.
pub fn find_symbol(buffer: &Buffer, symbol: &str) -> Option<(u16, u16)> {
    let area = buffer.area;
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if buffer.cell((x, y)).is_some_and(|c| c.symbol() == symbol) {
                return Some((x, y));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 1, "World", ratatui::style::Style::default());

        let result = buffer_to_string(&buffer);
        assert_eq!(result, "Hello\nWorld\n");
    }

    #[test]
    fn test_find_symbol() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(2, 1, "x>", ratatui::style::Style::default());
        assert_eq!(find_symbol(&buffer, ">"), Some((3, 1)));
        assert_eq!(find_symbol(&buffer, "#"), None);
    }
}
