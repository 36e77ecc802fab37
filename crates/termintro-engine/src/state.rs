//! Playback state for the typed intro.
//!
//! A `PlaybackState` is created fresh for every player and discarded once
//! the completion callback has fired.

use std::fmt;

/// Typing phase of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Revealing characters of the current line.
    #[default]
    Typing,
    /// Current line is fully typed; waiting before the next one.
    Pausing,
    /// No more characters will be revealed.
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typing => write!(f, "typing"),
            Self::Pausing => write!(f, "pausing"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Visibility of the intro while it winds down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitStage {
    /// Intro is on screen and playing.
    #[default]
    Shown,
    /// Typing finished naturally; the ready message is on screen.
    Holding,
    /// Exit transition is playing.
    Exiting,
    /// Exit finished and completion has fired.
    Dismissed,
}

/// How the intro ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every line was typed.
    Natural,
    /// The user skipped.
    Skipped,
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Natural => write!(f, "natural"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Observable state of a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    /// Line currently being typed; equals the script length once done.
    pub line_index: usize,

    /// Characters of the current line revealed so far.
    pub char_index: usize,

    /// Revealed text per line, each a prefix of its script line.
    pub revealed_lines: Vec<String>,

    pub phase: Phase,

    /// Blink state of the cursor.
    pub cursor_visible: bool,

    /// Whether a skip would currently be honored.
    pub skippable: bool,

    pub exit: ExitStage,

    /// Set once the exit transition starts.
    pub completion: Option<Completion>,
}

impl PlaybackState {
    /// Fresh state for a new player.
    pub fn new(skippable: bool) -> Self {
        Self {
            line_index: 0,
            char_index: 0,
            revealed_lines: Vec::new(),
            phase: Phase::Typing,
            cursor_visible: true,
            skippable,
            exit: ExitStage::Shown,
            completion: None,
        }
    }

    /// Whether the cursor should be drawn after line `index`.
    pub fn shows_cursor_on(&self, index: usize) -> bool {
        self.phase != Phase::Done && self.cursor_visible && index == self.line_index
    }

    /// Whether the ready message should be shown.
    pub fn is_ready(&self) -> bool {
        self.completion == Some(Completion::Natural)
    }

    /// Whether the intro has started leaving the screen.
    pub fn is_leaving(&self) -> bool {
        matches!(self.exit, ExitStage::Exiting | ExitStage::Dismissed)
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(true)
    }
}
