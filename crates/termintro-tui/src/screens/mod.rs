//! Screen definitions for the termintro TUI.

pub mod intro;

use crate::app::App;
use ratatui::{buffer::Buffer, layout::Rect};

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}
