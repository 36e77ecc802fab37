//! Script types for the typed intro.
//!
//! A script is an ordered list of lines, each typed one character at a
//! time and followed by a pause.

use crate::config::Timing;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single line of the intro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Text revealed character by character.
    pub text: String,

    /// Base delay between characters, before jitter.
    #[serde(default = "default_char_delay_ms", alias = "delay")]
    pub char_delay_ms: u64,

    /// Pause after the line is fully typed.
    #[serde(default = "default_pause_after_ms", alias = "pause_after")]
    pub pause_after_ms: u64,
}

fn default_char_delay_ms() -> u64 {
    70
}

fn default_pause_after_ms() -> u64 {
    500
}

impl Line {
    /// Create a line with explicit timing.
    pub fn new(text: impl Into<String>, char_delay_ms: u64, pause_after_ms: u64) -> Self {
        Self {
            text: text.into(),
            char_delay_ms,
            pause_after_ms,
        }
    }

    /// Number of characters to type.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Visual kind of the line, derived from its leading character.
    pub fn kind(&self) -> LineKind {
        LineKind::of(&self.text)
    }
}

/// How a line is styled when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `>` command echo.
    Command,
    /// `✓` success message.
    Success,
    /// `$` shell prompt.
    Prompt,
    /// Anything else.
    Plain,
}

impl LineKind {
    /// Classify text by its first character.
    pub fn of(text: &str) -> Self {
        match text.chars().next() {
            Some('>') => Self::Command,
            Some('✓') => Self::Success,
            Some('$') => Self::Prompt,
            _ => Self::Plain,
        }
    }
}

/// Ordered lines driving the intro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    lines: Vec<Line>,
}

impl Script {
    /// Create a script from lines.
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// A script with no lines.
    pub fn empty() -> Self {
        Self { lines: Vec::new() }
    }

    /// The lines in playback order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Get a line by index.
    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total characters across all lines.
    pub fn total_chars(&self) -> usize {
        self.lines.iter().map(Line::char_count).sum()
    }

    /// Natural playback length without jitter, through the completion callback.
    ///
    /// Saturates at `u64::MAX` milliseconds.
    pub fn estimated_duration(&self, timing: &Timing) -> Duration {
        let typing = self.lines.iter().fold(0u64, |total, line| {
            let per_char = line.char_delay_ms.max(timing.min_char_delay_ms);
            let chars = u64::try_from(line.char_count()).unwrap_or(u64::MAX);
            total
                .saturating_add(per_char.saturating_mul(chars))
                .saturating_add(line.pause_after_ms)
        });
        Duration::from_millis(
            typing
                .saturating_add(timing.finish_hold_ms)
                .saturating_add(timing.settle_ms),
        )
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new(vec![
            Line::new("> sahil@dev:~$ bun create next-app", 80, 800),
            Line::new("✓ Creating project...", 70, 600),
            Line::new("✓ Installing dependencies...", 70, 700),
            Line::new("✓ Project ready!", 70, 500),
            Line::new("$ bun run dev", 90, 900),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_script() {
        let script = Script::default();
        assert_eq!(script.len(), 5);
        assert_eq!(script.lines()[0].char_delay_ms, 80);
        assert_eq!(script.lines()[4].text, "$ bun run dev");
    }

    #[test]
    fn test_char_count_is_unicode_aware() {
        let line = Line::new("✓ ok", 70, 0);
        assert_eq!(line.char_count(), 4);
        assert_eq!(line.kind(), LineKind::Success);
    }

    #[test]
    fn test_line_kind() {
        assert_eq!(LineKind::of("> cmd"), LineKind::Command);
        assert_eq!(LineKind::of("✓ done"), LineKind::Success);
        assert_eq!(LineKind::of("$ run"), LineKind::Prompt);
        assert_eq!(LineKind::of("hello"), LineKind::Plain);
        assert_eq!(LineKind::of(""), LineKind::Plain);
    }

    #[test]
    fn test_line_defaults_and_aliases() {
        let line: Line = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(line.char_delay_ms, 70);
        assert_eq!(line.pause_after_ms, 500);

        let line: Line =
            serde_json::from_str(r#"{"text": "hi", "delay": 90, "pause_after": 100}"#).unwrap();
        assert_eq!(line.char_delay_ms, 90);
        assert_eq!(line.pause_after_ms, 100);
    }

    #[test]
    fn test_script_serializes_as_list() {
        let script = Script::new(vec![Line::new("A", 80, 100)]);
        let json = serde_json::to_string(&script).unwrap();
        assert!(json.starts_with('['));
        let back: Script = serde_json::from_str(&json).unwrap();
        assert_eq!(back, script);
    }

    #[test]
    fn test_estimated_duration() {
        let timing = Timing::default();
        let script = Script::new(vec![Line::new("AB", 80, 100), Line::new("", 50, 200)]);
        // 2*80 + 100 + 0 + 200 + hold 1000 + settle 800
        assert_eq!(
            script.estimated_duration(&timing),
            Duration::from_millis(2260)
        );
        assert_eq!(script.total_chars(), 2);
    }

    #[test]
    fn test_estimated_duration_saturates() {
        let timing = Timing::default();
        let script = Script::new(vec![Line::new("AB", u64::MAX / 2 + 1, 0)]);
        assert_eq!(
            script.estimated_duration(&timing),
            Duration::from_millis(u64::MAX)
        );

        let timing = Timing {
            finish_hold_ms: u64::MAX,
            ..Timing::default()
        };
        let script = Script::new(vec![Line::new("A", 80, u64::MAX)]);
        assert_eq!(
            script.estimated_duration(&timing),
            Duration::from_millis(u64::MAX)
        );
    }

    #[test]
    fn test_estimated_duration_empty() {
        let timing = Timing::default();
        assert_eq!(
            Script::empty().estimated_duration(&timing),
            Duration::from_millis(1800)
        );
    }
}
