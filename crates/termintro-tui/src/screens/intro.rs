//! Intro screen - the terminal card the script is typed into.

use crate::app::App;
use crate::screens::Screen;
use crate::ui::theme::{Palette, Styles, Symbols};
use crate::ui::card_area;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Widget},
};
use termintro_engine::{ExitStage, LineKind, PlaybackState, Script};
use unicode_width::UnicodeWidthStr;

/// The intro screen.
pub struct IntroScreen;

impl Screen for IntroScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        Block::default().style(Styles::default()).render(area, buf);

        if app.state.exit == ExitStage::Dismissed {
            return;
        }

        let fading = app.state.is_leaving();
        let card = card_area(app.script.len(), area);
        Clear.render(card, buf);

        let border_style = if fading {
            Styles::faded()
        } else {
            Styles::border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(window_controls(fading))
            .title(Line::from(Span::styled(app.title.clone(), Styles::title())).centered())
            .padding(Padding::horizontal(2))
            .style(Styles::card());

        let inner = block.inner(card);
        block.render(card, buf);

        Paragraph::new(content_lines(&app.state, &app.script, fading))
            .style(Styles::card())
            .render(inner, buf);

        if app.state.skippable && !fading {
            render_skip_hint(inner, buf);
        }
    }
}

fn window_controls(fading: bool) -> Line<'static> {
    let dot = |color| {
        if fading {
            Styles::faded()
        } else {
            Styles::dot(color)
        }
    };
    Line::from(vec![
        Span::styled(Symbols::DOT, dot(Palette::DOT_RED)),
        Span::raw(" "),
        Span::styled(Symbols::DOT, dot(Palette::DOT_YELLOW)),
        Span::raw(" "),
        Span::styled(Symbols::DOT, dot(Palette::DOT_GREEN)),
    ])
}

fn content_lines(state: &PlaybackState, script: &Script, fading: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::default()];

    for (index, text) in state.revealed_lines.iter().enumerate() {
        let style = if fading {
            Styles::faded()
        } else {
            let kind = script
                .get(index)
                .map_or(LineKind::Plain, termintro_engine::Line::kind);
            Styles::line(kind)
        };
        let mut spans = vec![Span::styled(text.clone(), style)];
        if !fading && state.shows_cursor_on(index) {
            spans.push(Span::styled(Symbols::CURSOR, Styles::cursor()));
        }
        lines.push(Line::from(spans));
    }

    if state.is_ready() {
        let style = if fading {
            Styles::faded()
        } else {
            Styles::ready()
        };
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(Symbols::READY, style)));
    }

    lines
}

/// Right-aligned hint on the last row of the card.
fn render_skip_hint(inner: Rect, buf: &mut Buffer) {
    if inner.height == 0 || inner.width == 0 {
        return;
    }
    let width = u16::try_from(Symbols::SKIP_HINT.width()).unwrap_or(u16::MAX);
    let x = inner.right().saturating_sub(width).max(inner.x);
    let y = inner.bottom() - 1;
    buf.set_stringn(
        x,
        y,
        Symbols::SKIP_HINT,
        usize::from(inner.width),
        Styles::dim(),
    );
}
