//! Application state for the termintro TUI.

use crate::event::Action;
use termintro_engine::{
    player_from_config, start_intro, Completion, ExitStage, IntroConfig, IntroHandle,
    PlaybackState, Script,
};
use tokio::sync::watch;
use tracing::debug;

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Title shown in the card header.
    pub title: String,

    /// Script being played, for rendering context.
    pub script: Script,

    /// Latest playback snapshot.
    pub state: PlaybackState,

    /// Should the app quit?
    pub should_quit: bool,

    /// Running intro; `None` once torn down.
    intro: Option<IntroHandle>,
}

impl App {
    /// Create the app and start playback.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &IntroConfig, seed: Option<u64>) -> Self {
        let handle = start_intro(player_from_config(config, seed));
        Self {
            title: config.title.clone(),
            script: config.script.clone(),
            state: handle.snapshot(),
            should_quit: false,
            intro: Some(handle),
        }
    }

    /// App with a fixed state and no running player.
    #[cfg(test)]
    pub fn new_for_test(title: &str, script: Script, state: PlaybackState) -> Self {
        Self {
            title: title.to_string(),
            script,
            state,
            should_quit: false,
            intro: None,
        }
    }

    /// Receiver for playback state changes.
    pub fn subscribe(&self) -> Option<watch::Receiver<PlaybackState>> {
        self.intro.as_ref().map(IntroHandle::subscribe)
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Skip => {
                if !self.state.skippable {
                    debug!("skip input ignored, intro not skippable");
                    return;
                }
                if let Some(intro) = &self.intro {
                    intro.skip();
                }
            }
            Action::Quit => {
                self.should_quit = true;
                // dropping the handle tears the player down
                self.intro = None;
            }
            Action::None => {}
        }
    }

    /// Pull the latest snapshot from the player.
    pub fn sync(&mut self) {
        if let Some(intro) = &self.intro {
            self.state = intro.snapshot();
        }
    }

    /// Whether the intro has finished and the host should move on.
    pub fn is_dismissed(&self) -> bool {
        self.state.exit == ExitStage::Dismissed
    }

    /// How the intro ended, once it has.
    pub fn completion(&self) -> Option<Completion> {
        if self.is_dismissed() {
            self.state.completion
        } else {
            None
        }
    }

    /// Tear the player down.
    pub fn close(&mut self) {
        self.intro = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use termintro_engine::{Line, Phase, Timing};

    fn short_config() -> IntroConfig {
        IntroConfig {
            timing: Timing::default(),
            skippable: true,
            title: "me@box".into(),
            script: Script::new(vec![Line::new("hello", 50, 100)]),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_app_plays_to_completion() {
        let mut app = App::new(&short_config(), Some(1));
        assert_eq!(app.title, "me@box");
        assert!(!app.is_dismissed());

        tokio::time::sleep(Duration::from_secs(5)).await;
        app.sync();
        assert!(app.is_dismissed());
        assert_eq!(app.completion(), Some(Completion::Natural));
        assert_eq!(app.state.revealed_lines, vec!["hello"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_action() {
        let mut app = App::new(&short_config(), Some(1));
        app.handle_action(Action::Skip);

        tokio::time::sleep(Duration::from_millis(900)).await;
        app.sync();
        assert_eq!(app.completion(), Some(Completion::Skipped));
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_ignored_when_not_skippable() {
        let mut config = short_config();
        config.skippable = false;
        let mut app = App::new(&config, Some(1));
        app.handle_action(Action::Skip);

        tokio::time::sleep(Duration::from_millis(900)).await;
        app.sync();
        assert_eq!(app.completion(), None);
        assert_ne!(app.state.phase, Phase::Typing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_tears_down() {
        let mut app = App::new(&short_config(), Some(1));
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
        assert!(app.subscribe().is_none());

        tokio::time::sleep(Duration::from_secs(5)).await;
        app.sync();
        assert!(!app.is_dismissed());
        assert_eq!(app.completion(), None);
    }
}
