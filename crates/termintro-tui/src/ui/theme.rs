//! Theme and styling definitions for the termintro TUI.

use ratatui::style::{Color, Modifier, Style};
use termintro_engine::LineKind;

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(5, 5, 5);
    pub const CARD_BG: Color = Color::Rgb(10, 10, 10);
    pub const FG: Color = Color::Rgb(220, 220, 225);
    pub const DIM: Color = Color::Rgb(107, 114, 128);
    pub const FADED: Color = Color::Rgb(55, 55, 60);

    // Line colors
    pub const CYAN: Color = Color::Rgb(34, 211, 238);
    pub const GREEN: Color = Color::Rgb(74, 222, 128);
    pub const PURPLE: Color = Color::Rgb(192, 132, 252);

    // Window controls
    pub const DOT_RED: Color = Color::Rgb(239, 68, 68);
    pub const DOT_YELLOW: Color = Color::Rgb(234, 179, 8);
    pub const DOT_GREEN: Color = Color::Rgb(34, 197, 94);

    pub const BORDER: Color = Color::Rgb(0, 110, 30);
}

/// Glyphs drawn by the intro.
pub struct Symbols;

impl Symbols {
    pub const CURSOR: &'static str = "█";
    pub const DOT: &'static str = "●";
    pub const READY: &'static str = "✓ Ready to launch...";
    pub const SKIP_HINT: &'static str = "Press any key to skip";
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Screen background.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Inside of the terminal card.
    pub fn card() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::CARD_BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::CARD_BG)
    }

    /// Everything on the card while the exit transition plays.
    pub fn faded() -> Style {
        Style::default()
            .fg(Palette::FADED)
            .bg(Palette::CARD_BG)
            .add_modifier(Modifier::DIM)
    }

    /// Style for a revealed line.
    pub fn line(kind: LineKind) -> Style {
        let base = Self::card();
        match kind {
            LineKind::Command => base.fg(Palette::CYAN),
            LineKind::Success => base.fg(Palette::GREEN),
            LineKind::Prompt => base.fg(Palette::PURPLE),
            LineKind::Plain => base,
        }
    }

    /// Block cursor.
    pub fn cursor() -> Style {
        Style::default().fg(Palette::GREEN).bg(Palette::CARD_BG)
    }

    /// Ready message after natural completion.
    pub fn ready() -> Style {
        Style::default()
            .fg(Palette::GREEN)
            .bg(Palette::CARD_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default().fg(Palette::DIM)
    }

    /// Window control dot.
    pub fn dot(color: Color) -> Style {
        Style::default().fg(color)
    }

    /// Border style for the card.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }
}
