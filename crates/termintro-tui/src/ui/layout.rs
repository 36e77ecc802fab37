//! Layout helpers for the termintro TUI.

use ratatui::layout::Rect;

/// Widest the terminal card grows.
pub const CARD_MAX_WIDTH: u16 = 64;

/// Shortest the terminal card gets, when there is room.
pub const CARD_MIN_HEIGHT: u16 = 12;

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Area of the terminal card for a script with `lines` lines.
///
/// Rows: border, blank, lines, blank, ready message, blank, hint, border.
pub fn card_area(lines: usize, area: Rect) -> Rect {
    let lines = u16::try_from(lines).unwrap_or(u16::MAX);
    let width = CARD_MAX_WIDTH.min(area.width.saturating_sub(4)).max(area.width.min(20));
    let height = lines.saturating_add(7).max(CARD_MIN_HEIGHT);
    centered_fixed(width, height, area)
}
