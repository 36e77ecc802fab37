//! The typed sequence player.
//!
//! `TypedSequencePlayer` is a clock-injected state machine: the caller passes
//! the current instant to every operation and the player tells it when the
//! next timer is due. At most one playback timer is pending at any time;
//! every transition replaces it, and `skip` drops it. The cursor blink runs
//! on its own deadline for the lifetime of the player.

use crate::config::Timing;
use crate::jitter::{Jitter, RandomJitter};
use crate::script::Script;
use crate::state::{Completion, ExitStage, Phase, PlaybackState};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Callback invoked once when the intro has finished leaving the screen.
pub type CompletionCallback = Box<dyn FnOnce(Completion) + Send>;

/// Events emitted by the player as it advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Playback started.
    Started { lines: usize },
    /// A character was appended to a line.
    CharRevealed { line: usize, ch: char },
    /// A line is fully typed and its pause has begun.
    LineTyped { line: usize },
    /// Typing moved on to a new line.
    LineAdvanced { line: usize },
    /// Every line was typed.
    TypingComplete,
    /// The user skipped at the given position.
    Skipped { line: usize, chars: usize },
    /// The exit transition started.
    ExitStarted { completion: Completion },
    /// The completion callback fired.
    Completed { completion: Completion },
    /// The cursor blinked.
    CursorToggled { visible: bool },
}

/// What the pending timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    RevealChar,
    ResumeLine,
    BeginExit,
    Settle(Completion),
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    deadline: Instant,
    kind: TimerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Running,
    Finished,
    TornDown,
}

/// One-shot gate around the completion callback.
#[derive(Default)]
struct CompletionGate {
    callback: Option<CompletionCallback>,
    fired: bool,
}

impl CompletionGate {
    /// Fire the callback. Returns `false` if the gate was already used.
    fn fire(&mut self, completion: Completion) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        if let Some(callback) = self.callback.take() {
            callback(completion);
        }
        true
    }

    /// Drop the callback without firing it.
    fn close(&mut self) {
        self.fired = true;
        self.callback = None;
    }
}

/// Plays a script of lines character by character.
pub struct TypedSequencePlayer {
    script: Script,
    timing: Timing,
    jitter: Box<dyn Jitter>,
    state: PlaybackState,
    /// Characters of the line being typed.
    current: Vec<char>,
    lifecycle: Lifecycle,
    pending: Option<Timer>,
    blink_at: Option<Instant>,
    gate: CompletionGate,
}

impl fmt::Debug for TypedSequencePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSequencePlayer")
            .field("lines", &self.script.len())
            .field("state", &self.state)
            .field("lifecycle", &self.lifecycle)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl TypedSequencePlayer {
    /// Create a player with random jitter.
    pub fn new(script: Script, timing: Timing) -> Self {
        Self {
            script,
            timing,
            jitter: Box::new(RandomJitter::new()),
            state: PlaybackState::new(true),
            current: Vec::new(),
            lifecycle: Lifecycle::Idle,
            pending: None,
            blink_at: None,
            gate: CompletionGate::default(),
        }
    }

    /// Replace the jitter source.
    #[must_use]
    pub fn with_jitter(mut self, jitter: impl Jitter + 'static) -> Self {
        self.jitter = Box::new(jitter);
        self
    }

    /// Allow or forbid skipping.
    #[must_use]
    pub fn with_skippable(mut self, skippable: bool) -> Self {
        self.state.skippable = skippable;
        self
    }

    /// Register the completion callback.
    #[must_use]
    pub fn on_complete(mut self, callback: impl FnOnce(Completion) + Send + 'static) -> Self {
        self.gate.callback = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Whether the completion callback has fired.
    pub fn is_complete(&self) -> bool {
        self.lifecycle == Lifecycle::Finished
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifecycle == Lifecycle::TornDown
    }

    /// Earliest instant at which `advance` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.pending.map(|t| t.deadline), self.blink_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Begin playback at `now`.
    ///
    /// Calling `start` more than once has no effect.
    pub fn start(&mut self, now: Instant) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        if self.lifecycle != Lifecycle::Idle {
            return events;
        }
        self.lifecycle = Lifecycle::Running;
        self.blink_at = Some(now + self.timing.cursor_blink());
        events.push(PlayerEvent::Started {
            lines: self.script.len(),
        });

        if self.script.is_empty() {
            self.finish_typing(now, &mut events);
        } else {
            self.begin_line(now, &mut events);
        }
        events
    }

    /// Fire every timer due at or before `now`, in deadline order.
    ///
    /// Rescheduling is relative to each timer's own deadline, so a late call
    /// does not stretch the sequence.
    pub fn advance(&mut self, now: Instant) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        loop {
            let pending_due = self.pending.filter(|t| t.deadline <= now);
            let blink_due = self.blink_at.filter(|at| *at <= now);

            match (pending_due, blink_due) {
                (Some(timer), Some(blink)) if blink < timer.deadline => {
                    self.toggle_cursor(blink, &mut events);
                }
                (Some(timer), _) => {
                    self.pending = None;
                    self.fire(timer, &mut events);
                }
                (None, Some(blink)) => self.toggle_cursor(blink, &mut events),
                (None, None) => break,
            }
        }
        events
    }

    /// Short-circuit to the exit transition.
    ///
    /// Only the first call while skippable has an effect.
    pub fn skip(&mut self, now: Instant) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        if self.lifecycle != Lifecycle::Running || !self.state.skippable {
            debug!(lifecycle = ?self.lifecycle, "skip ignored");
            return events;
        }
        self.state.skippable = false;
        self.pending = None;
        self.current.clear();
        self.state.phase = Phase::Done;

        events.push(PlayerEvent::Skipped {
            line: self.state.line_index,
            chars: self.state.char_index,
        });
        self.start_exit(Completion::Skipped, now, &mut events);
        events
    }

    /// Cancel every timer. The completion callback will never fire afterwards.
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.pending = None;
        self.blink_at = None;
        self.state.skippable = false;
        self.lifecycle = Lifecycle::TornDown;
        self.gate.close();
    }

    fn fire(&mut self, timer: Timer, events: &mut Vec<PlayerEvent>) {
        let at = timer.deadline;
        match timer.kind {
            TimerKind::RevealChar => self.reveal_char(at, events),
            TimerKind::ResumeLine => self.resume_line(at, events),
            TimerKind::BeginExit => self.start_exit(Completion::Natural, at, events),
            TimerKind::Settle(completion) => self.settle(completion, events),
        }
    }

    fn schedule(&mut self, deadline: Instant, kind: TimerKind) {
        self.pending = Some(Timer { deadline, kind });
    }

    fn begin_line(&mut self, now: Instant, events: &mut Vec<PlayerEvent>) {
        let index = self.state.line_index;
        let Some(line) = self.script.get(index) else {
            return;
        };
        let (base_delay, pause) = (line.char_delay_ms, line.pause_after_ms);
        self.current = line.text.chars().collect();

        self.state.phase = Phase::Typing;
        self.state.char_index = 0;
        self.state.revealed_lines.push(String::new());

        if self.current.is_empty() {
            self.state.phase = Phase::Pausing;
            events.push(PlayerEvent::LineTyped { line: index });
            self.schedule(now + Duration::from_millis(pause), TimerKind::ResumeLine);
        } else {
            let delay = self.char_delay(base_delay);
            self.schedule(now + delay, TimerKind::RevealChar);
        }
    }

    fn reveal_char(&mut self, at: Instant, events: &mut Vec<PlayerEvent>) {
        if self.state.phase != Phase::Typing {
            return;
        }
        let index = self.state.line_index;
        let Some(line) = self.script.get(index) else {
            return;
        };
        let Some(&ch) = self.current.get(self.state.char_index) else {
            return;
        };
        let (count, base_delay, pause) = (self.current.len(), line.char_delay_ms, line.pause_after_ms);

        if let Some(revealed) = self.state.revealed_lines.get_mut(index) {
            revealed.push(ch);
        }
        self.state.char_index += 1;
        events.push(PlayerEvent::CharRevealed { line: index, ch });

        if self.state.char_index < count {
            let delay = self.char_delay(base_delay);
            self.schedule(at + delay, TimerKind::RevealChar);
        } else {
            self.state.phase = Phase::Pausing;
            events.push(PlayerEvent::LineTyped { line: index });
            self.schedule(at + Duration::from_millis(pause), TimerKind::ResumeLine);
        }
    }

    fn resume_line(&mut self, at: Instant, events: &mut Vec<PlayerEvent>) {
        self.state.line_index += 1;
        self.state.char_index = 0;

        if self.state.line_index >= self.script.len() {
            self.finish_typing(at, events);
        } else {
            events.push(PlayerEvent::LineAdvanced {
                line: self.state.line_index,
            });
            self.begin_line(at, events);
        }
    }

    fn finish_typing(&mut self, at: Instant, events: &mut Vec<PlayerEvent>) {
        self.current.clear();
        self.state.line_index = self.script.len();
        self.state.char_index = 0;
        self.state.phase = Phase::Done;
        self.state.exit = ExitStage::Holding;
        self.state.completion = Some(Completion::Natural);
        events.push(PlayerEvent::TypingComplete);
        self.schedule(at + self.timing.finish_hold(), TimerKind::BeginExit);
    }

    fn start_exit(&mut self, completion: Completion, at: Instant, events: &mut Vec<PlayerEvent>) {
        self.state.skippable = false;
        self.state.phase = Phase::Done;
        self.state.exit = ExitStage::Exiting;
        self.state.completion = Some(completion);
        events.push(PlayerEvent::ExitStarted { completion });
        self.schedule(at + self.timing.settle(), TimerKind::Settle(completion));
    }

    fn settle(&mut self, completion: Completion, events: &mut Vec<PlayerEvent>) {
        self.state.exit = ExitStage::Dismissed;
        self.lifecycle = Lifecycle::Finished;
        if self.gate.fire(completion) {
            events.push(PlayerEvent::Completed { completion });
        }
    }

    fn toggle_cursor(&mut self, at: Instant, events: &mut Vec<PlayerEvent>) {
        self.state.cursor_visible = !self.state.cursor_visible;
        self.blink_at = Some(at + self.timing.cursor_blink());
        events.push(PlayerEvent::CursorToggled {
            visible: self.state.cursor_visible,
        });
    }

    fn char_delay(&mut self, base_ms: u64) -> Duration {
        let offset = self.jitter.sample(self.timing.jitter_ms);
        self.timing.char_delay(base_ms, offset)
    }
}
