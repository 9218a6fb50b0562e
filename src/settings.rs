//! Simulation settings
//!
//! Durations are configured in wall-clock units and converted to ticks with
//! the configured tick rate. Persisted as JSON next to the binary.

use std::fmt;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::ms_to_ticks;

/// Environment variable naming a settings file for `Settings::load`
pub const SETTINGS_ENV: &str = "QUIZ_FIREWORKS_SETTINGS";

/// Errors raised while loading or validating settings
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(String),
    /// A value is outside its allowed range
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "Settings IO error: {}", err),
            ConfigError::Parse(msg) => write!(f, "Settings parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid setting: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Quiz and effect settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Fixed simulation tick rate (Hz)
    pub tick_rate_hz: f32,
    /// How long answer feedback is shown before advancing (ms)
    pub feedback_duration_ms: u32,

    // === Quiz ===
    /// Questions drawn per session
    pub questions_per_session: usize,
    /// Fraction of questions that must be correct to earn fireworks
    pub celebration_ratio: f32,
    /// RNG seed; `None` picks one from the system clock
    pub seed: Option<u64>,

    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Effects ===
    /// Per-tick firework launch chance while celebrating
    pub firework_probability: f32,
    /// Background particles
    pub ambient_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate_hz: REFERENCE_TICK_HZ,
            feedback_duration_ms: FEEDBACK_DURATION_MS,

            questions_per_session: QUESTIONS_PER_SESSION,
            celebration_ratio: 0.5,
            seed: None,

            viewport_width: 1280.0,
            viewport_height: 720.0,

            firework_probability: FIREWORK_SPAWN_PROBABILITY,
            ambient_count: AMBIENT_COUNT,
        }
    }
}

impl Settings {
    /// Feedback duration converted to ticks at the configured rate
    pub fn feedback_ticks(&self) -> u32 {
        ms_to_ticks(self.feedback_duration_ms, self.tick_rate_hz)
    }

    /// Seconds per tick
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate_hz
    }

    /// Reference ticks per configured tick (1.0 at 60 Hz)
    pub fn tick_scale(&self) -> f32 {
        REFERENCE_TICK_HZ / self.tick_rate_hz
    }

    /// Launch chance per tick, rescaled so the per-second rate is the same
    /// at any tick rate
    pub fn firework_probability_per_tick(&self) -> f32 {
        let scale = self.tick_scale();
        if (scale - 1.0).abs() < f32::EPSILON {
            self.firework_probability
        } else {
            1.0 - (1.0 - self.firework_probability).powf(scale)
        }
    }

    /// Minimum score that enables fireworks: ceil(N * ratio)
    pub fn celebration_threshold(&self) -> u32 {
        (self.questions_per_session as f32 * self.celebration_ratio).ceil() as u32
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tick_rate_hz must be positive, got {}",
                self.tick_rate_hz
            )));
        }
        if self.questions_per_session == 0 {
            return Err(ConfigError::Invalid(
                "questions_per_session must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.celebration_ratio) {
            return Err(ConfigError::Invalid(format!(
                "celebration_ratio must be within 0..=1, got {}",
                self.celebration_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.firework_probability) {
            return Err(ConfigError::Invalid(format!(
                "firework_probability must be within 0..=1, got {}",
                self.firework_probability
            )));
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !(positive(self.viewport_width) && positive(self.viewport_height)) {
            return Err(ConfigError::Invalid("viewport must have a positive size".into()));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load from the file named by `QUIZ_FIREWORKS_SETTINGS`, falling back to defaults
    pub fn load() -> Self {
        let Ok(path) = std::env::var(SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("{} ({}); using default settings", e, path);
                Self::default()
            }
        }
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_timing() {
        let settings = Settings::default();
        assert_eq!(settings.feedback_ticks(), 45);
        assert!((settings.tick_scale() - 1.0).abs() < f32::EPSILON);
        assert_eq!(settings.celebration_threshold(), 2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_feedback_ticks_follow_tick_rate() {
        let settings = Settings {
            tick_rate_hz: 30.0,
            ..Default::default()
        };
        assert_eq!(settings.feedback_ticks(), 23);
        assert!((settings.tick_scale() - 2.0).abs() < f32::EPSILON);
        // Two reference ticks' worth of launch chance
        let expected = 1.0 - 0.96f32 * 0.96;
        assert!((settings.firework_probability_per_tick() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_celebration_threshold_rounds_up() {
        let settings = Settings {
            questions_per_session: 5,
            ..Default::default()
        };
        assert_eq!(settings.celebration_threshold(), 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json_str(r#"{"tick_rate_hz": 120.0, "seed": 9}"#).unwrap();
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.feedback_ticks(), 90);
        assert_eq!(settings.questions_per_session, QUESTIONS_PER_SESSION);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Settings::from_json_str(r#"{"tick_rate_hz": 0.0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json_str(r#"{"questions_per_session": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json_str(r#"{"firework_probability": 1.5}"#),
            Err(ConfigError::Invalid(_))
        ));
        let zero_width = Settings {
            viewport_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(zero_width.validate(), Err(ConfigError::Invalid(_))));
        let infinite_height = Settings {
            viewport_height: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(infinite_height.validate(), Err(ConfigError::Invalid(_))));
        assert!(matches!(
            Settings::from_json_str("nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "quiz-fireworks-settings-{}.json",
            std::process::id()
        ));
        let settings = Settings {
            tick_rate_hz: 30.0,
            seed: Some(77),
            ambient_count: 12,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.tick_rate_hz, 30.0);
        assert_eq!(loaded.seed, Some(77));
        assert_eq!(loaded.ambient_count, 12);
        assert_eq!(loaded.feedback_ticks(), settings.feedback_ticks());
    }
}
