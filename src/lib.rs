//! Quiz Fireworks - a four-question quiz toy with celebratory particles
//!
//! Core modules:
//! - `bank`: Question records and the read-only question bank
//! - `sim`: Deterministic tick-driven simulation (quiz session, particles, fireworks)
//! - `settings`: Tunable timings and viewport, loaded from JSON

pub mod bank;
pub mod settings;
pub mod sim;

pub use bank::{BankError, Label, Question, QuestionBank};
pub use settings::{ConfigError, Settings};

use glam::Vec2;

/// Simulation constants, expressed per reference tick unless noted
pub mod consts {
    use glam::Vec2;

    /// Tick rate the per-tick physics constants were tuned for
    pub const REFERENCE_TICK_HZ: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the clock will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Questions drawn per session
    pub const QUESTIONS_PER_SESSION: usize = 4;
    /// How long answer feedback stays on screen (45 ticks at 60 Hz)
    pub const FEEDBACK_DURATION_MS: u32 = 750;

    /// Global gravity (pixels per tick²)
    pub const GRAVITY: Vec2 = Vec2::new(0.0, 0.2);
    /// Starting lifespan of every burst particle
    pub const PARTICLE_LIFESPAN: f32 = 255.0;
    /// Multiplicative velocity damping for burst particles
    pub const BURST_DAMPING: f32 = 0.98;
    /// Random spread around a burst origin (pixels, each axis)
    pub const BURST_JITTER: f32 = 10.0;

    /// Feedback burst sizes
    pub const FEEDBACK_BURST_CORRECT: usize = 18;
    pub const FEEDBACK_BURST_WRONG: usize = 12;

    /// Debris particles per firework explosion
    pub const FIREWORK_DEBRIS: usize = 80;
    /// Per-tick chance of launching a firework while celebrating
    pub const FIREWORK_SPAWN_PROBABILITY: f32 = 0.04;
    /// Horizontal margin for rocket launch positions
    pub const FIREWORK_LAUNCH_MARGIN: f32 = 50.0;

    /// Ambient background field
    pub const AMBIENT_COUNT: usize = 60;
    /// Distance past the viewport edge before an ambient particle wraps
    pub const AMBIENT_WRAP_MARGIN: f32 = 10.0;
}

/// Unit vector pointing along `theta` (radians)
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Convert a wall-clock duration to whole ticks at the given rate (at least one)
#[inline]
pub fn ms_to_ticks(ms: u32, tick_hz: f32) -> u32 {
    ((ms as f32 * tick_hz / 1000.0).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks_reference_rate() {
        assert_eq!(ms_to_ticks(consts::FEEDBACK_DURATION_MS, 60.0), 45);
        assert_eq!(ms_to_ticks(consts::FEEDBACK_DURATION_MS, 120.0), 90);
        assert_eq!(ms_to_ticks(0, 60.0), 1);
    }

    #[test]
    fn test_unit_from_angle() {
        let v = unit_from_angle(std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
        assert!((unit_from_angle(1.234).length() - 1.0).abs() < 1e-5);
    }
}
