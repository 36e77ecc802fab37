//! termintro-engine: Headless engine for the typed terminal intro
//!
//! This crate provides the playback logic for termintro, including:
//! - Script and timing configuration
//! - The typed sequence player state machine
//! - An async driver that runs the player on a tokio task

pub mod config;
pub mod driver;
pub mod jitter;
pub mod player;
pub mod script;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, IntroConfig, Timing, DEFAULT_CONFIG_PATH};
pub use driver::{start_intro, IntroCommand, IntroHandle};
pub use jitter::{FixedJitter, Jitter, NoJitter, RandomJitter};
pub use player::{CompletionCallback, PlayerEvent, TypedSequencePlayer};
pub use script::{Line, LineKind, Script};
pub use state::{Completion, ExitStage, Phase, PlaybackState};

/// Build a player from a configuration, seeding the jitter when asked.
pub fn player_from_config(config: &IntroConfig, seed: Option<u64>) -> TypedSequencePlayer {
    let jitter = seed.map_or_else(RandomJitter::new, RandomJitter::seeded);
    TypedSequencePlayer::new(config.script.clone(), config.timing)
        .with_jitter(jitter)
        .with_skippable(config.skippable)
}

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }

    #[test]
    fn test_player_from_config() {
        let mut config = IntroConfig::default();
        config.skippable = false;
        let player = player_from_config(&config, Some(3));
        assert!(!player.state().skippable);
        assert_eq!(player.script().len(), 5);
    }
}
