//! Game settings
//!
//! Read from an optional JSON file; every field has a default so partial
//! files are fine.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::WARMUP_MS;
use crate::renderer::Color;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Demo autoplayer, tapping a random slot at a fixed interval
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoplaySettings {
    /// RNG seed for the tap sequence
    pub seed: u64,
    /// Time between taps
    pub tap_interval_ms: u64,
    /// How long the demo runs before pausing and shutting down
    pub duration_ms: u64,
    /// Chance (0-1) of a tap landing away from every slot
    pub miss_chance: f32,
}

impl Default for AutoplaySettings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            tap_interval_ms: 400,
            duration_ms: 3000,
            miss_chance: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Delay after start/unpause before men begin to walk
    pub warmup_ms: u64,
    /// Sleep between loop iterations (0 = run flat out)
    pub frame_interval_ms: u64,
    /// Fill color of a closed cover
    pub cover_color: Color,
    pub autoplay: AutoplaySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            warmup_ms: WARMUP_MS,
            frame_interval_ms: 16,
            cover_color: Color::GRAY,
            autoplay: AutoplaySettings::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `path`, falling back to defaults if it can't be used
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }

    /// None means no pacing between frames
    pub fn frame_interval(&self) -> Option<Duration> {
        (self.frame_interval_ms > 0).then(|| Duration::from_millis(self.frame_interval_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.warmup(), Duration::from_millis(100));
        assert_eq!(settings.frame_interval(), Some(Duration::from_millis(16)));
        assert_eq!(settings.cover_color, Color::GRAY);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "frame_interval_ms": 0, "autoplay": { "seed": 7 } }"#).unwrap();
        assert_eq!(settings.frame_interval(), None);
        assert_eq!(settings.warmup_ms, 100);
        assert_eq!(settings.autoplay.seed, 7);
        assert_eq!(settings.autoplay.tap_interval_ms, 400);
    }

    #[test]
    fn test_cover_color_from_json() {
        let settings = Settings::from_json(r#"{ "cover_color": { "r": 1, "g": 2, "b": 3, "a": 255 } }"#).unwrap();
        assert_eq!(settings.cover_color, Color::new_rgb(1, 2, 3));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(Settings::from_json("{ nope"), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/manhole-settings.json");
        assert_eq!(settings.warmup_ms, WARMUP_MS);
        assert!(matches!(
            Settings::load("/nonexistent/manhole-settings.json"),
            Err(SettingsError::Io(_))
        ));
    }
}
