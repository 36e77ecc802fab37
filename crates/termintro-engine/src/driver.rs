//! Async driver for the typed sequence player.
//!
//! The driver moves a player onto a tokio task that owns it exclusively.
//! User input reaches the player as commands over a channel; timers are
//! served by sleeping until the player's next deadline. Each step publishes
//! a state snapshot and forwards player events.

use crate::player::{PlayerEvent, TypedSequencePlayer};
use crate::state::{Completion, PlaybackState};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

/// Commands accepted by a running intro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroCommand {
    /// Skip to the exit transition.
    Skip,
    /// Tear the player down.
    Shutdown,
}

/// Handle for controlling a running intro.
///
/// Dropping the handle tears the player down: no timer fires and no
/// callback runs afterwards.
#[derive(Debug)]
pub struct IntroHandle {
    command_tx: mpsc::UnboundedSender<IntroCommand>,
    state_rx: watch::Receiver<PlaybackState>,
    event_rx: Option<mpsc::UnboundedReceiver<PlayerEvent>>,
    completion_rx: Option<oneshot::Receiver<Completion>>,
    task: Option<JoinHandle<()>>,
}

impl IntroHandle {
    /// Request a skip.
    ///
    /// Returns true if the request was delivered; the player still decides
    /// whether to honor it.
    pub fn skip(&self) -> bool {
        self.command_tx.send(IntroCommand::Skip).is_ok()
    }

    /// Latest published state.
    pub fn snapshot(&self) -> PlaybackState {
        self.state_rx.borrow().clone()
    }

    /// A receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state_rx.clone()
    }

    /// Take the event stream. Returns `None` after the first call.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<PlayerEvent>> {
        self.event_rx.take()
    }

    /// Wait for the completion callback.
    ///
    /// Returns `None` if the player was torn down first, or if called again.
    pub async fn wait_complete(&mut self) -> Option<Completion> {
        match self.completion_rx.take() {
            Some(rx) => rx.await.ok(),
            None => None,
        }
    }

    /// Tear the player down and wait for the task to exit.
    pub async fn shutdown(mut self) {
        let _ = self.command_tx.send(IntroCommand::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for IntroHandle {
    fn drop(&mut self) {
        let _ = self.command_tx.send(IntroCommand::Shutdown);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Start playing on a background task.
///
/// Must be called from within a tokio runtime.
pub fn start_intro(player: TypedSequencePlayer) -> IntroHandle {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(player.state().clone());
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (completion_tx, completion_rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        drive(player, command_rx, state_tx, event_tx, completion_tx).await;
    });

    IntroHandle {
        command_tx,
        state_rx,
        event_rx: Some(event_rx),
        completion_rx: Some(completion_rx),
        task: Some(task),
    }
}

/// The driver loop.
///
/// Event sends ignore failures: a host that dropped its receiver still gets
/// a correctly played intro.
async fn drive(
    mut player: TypedSequencePlayer,
    mut command_rx: mpsc::UnboundedReceiver<IntroCommand>,
    state_tx: watch::Sender<PlaybackState>,
    event_tx: mpsc::UnboundedSender<PlayerEvent>,
    completion_tx: oneshot::Sender<Completion>,
) {
    let mut completion_tx = Some(completion_tx);

    let events = player.start(Instant::now());
    info!(lines = player.script().len(), "intro started");
    publish(&player, events, &state_tx, &event_tx, &mut completion_tx);

    loop {
        let deadline = player.next_deadline();
        let events = tokio::select! {
            biased;
            command = command_rx.recv() => match command {
                Some(IntroCommand::Skip) => player.skip(Instant::now()),
                Some(IntroCommand::Shutdown) | None => {
                    player.teardown();
                    debug!("intro torn down");
                    break;
                }
            },
            () = sleep_until(deadline) => player.advance(Instant::now()),
        };
        publish(&player, events, &state_tx, &event_tx, &mut completion_tx);
    }

    let _ = state_tx.send(player.state().clone());
}

fn publish(
    player: &TypedSequencePlayer,
    events: Vec<PlayerEvent>,
    state_tx: &watch::Sender<PlaybackState>,
    event_tx: &mpsc::UnboundedSender<PlayerEvent>,
    completion_tx: &mut Option<oneshot::Sender<Completion>>,
) {
    if events.is_empty() {
        return;
    }
    for event in events {
        match &event {
            PlayerEvent::Skipped { line, chars } => {
                info!(line, chars, "intro skipped");
            }
            PlayerEvent::ExitStarted { completion } => {
                debug!(%completion, "exit transition started");
            }
            PlayerEvent::Completed { completion } => {
                info!(%completion, "intro complete");
                if let Some(tx) = completion_tx.take() {
                    let _ = tx.send(*completion);
                }
            }
            PlayerEvent::LineTyped { line } => debug!(line, "line typed"),
            _ => {}
        }
        let _ = event_tx.send(event);
    }
    let _ = state_tx.send(player.state().clone());
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
