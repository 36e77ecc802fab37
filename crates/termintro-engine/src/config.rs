//! Configuration types for the termintro engine.
//!
//! This module defines the timing knobs of the intro and the on-disk
//! configuration that bundles them with the script.

use crate::script::Script;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".termintro/config.json";

/// Timing values for playback.
///
/// These are tuning values; nothing in the player depends on their exact
/// magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Jitter applied to each character delay, uniform in `[-jitter, +jitter]`.
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,

    /// Floor for a jittered character delay.
    #[serde(default = "default_min_char_delay_ms")]
    pub min_char_delay_ms: u64,

    /// Cursor blink half-period.
    #[serde(default = "default_cursor_blink_ms")]
    pub cursor_blink_ms: u64,

    /// Hold after the last line before the exit transition starts.
    #[serde(default = "default_finish_hold_ms")]
    pub finish_hold_ms: u64,

    /// Length of the exit transition before completion fires.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_jitter_ms() -> u64 {
    20
}

fn default_min_char_delay_ms() -> u64 {
    10
}

fn default_cursor_blink_ms() -> u64 {
    500
}

fn default_finish_hold_ms() -> u64 {
    1000
}

fn default_settle_ms() -> u64 {
    800
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            jitter_ms: default_jitter_ms(),
            min_char_delay_ms: default_min_char_delay_ms(),
            cursor_blink_ms: default_cursor_blink_ms(),
            finish_hold_ms: default_finish_hold_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl Timing {
    pub fn cursor_blink(&self) -> Duration {
        Duration::from_millis(self.cursor_blink_ms)
    }

    pub fn finish_hold(&self) -> Duration {
        Duration::from_millis(self.finish_hold_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Apply jitter to a base delay, clamped to the configured floor.
    pub fn char_delay(&self, base_ms: u64, jitter_ms: i64) -> Duration {
        let base = i64::try_from(base_ms).unwrap_or(i64::MAX);
        let floor = i64::try_from(self.min_char_delay_ms).unwrap_or(i64::MAX);
        let ms = base.saturating_add(jitter_ms).max(floor);
        Duration::from_millis(ms.unsigned_abs())
    }
}

/// Main configuration for the intro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroConfig {
    /// Timing values.
    #[serde(default)]
    pub timing: Timing,

    /// Whether the user may skip the intro.
    #[serde(default = "default_skippable")]
    pub skippable: bool,

    /// Title shown in the terminal card header.
    #[serde(default = "default_title")]
    pub title: String,

    /// The lines to play.
    #[serde(default)]
    pub script: Script,
}

fn default_skippable() -> bool {
    true
}

fn default_title() -> String {
    "sahil@dev:~".into()
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            skippable: default_skippable(),
            title: default_title(),
            script: Script::default(),
        }
    }
}

impl IntroConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Check values the player cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.cursor_blink_ms == 0 {
            return Err(ConfigError::Invalid(
                "cursor_blink_ms must be greater than zero".into(),
            ));
        }
        if self.timing.min_char_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "min_char_delay_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// JSON serialize error.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Values that cannot be played.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
