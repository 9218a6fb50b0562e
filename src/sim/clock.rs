//! Fixed-timestep clock
//!
//! Turns variable frame times into a whole number of simulation ticks and
//! keeps a running measurement of the achieved tick rate.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};

/// Seconds of real time per tick-rate measurement window
const MEASURE_WINDOW: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct SimulationClock {
    tick_dt: f32,
    accumulator: f32,
    max_substeps: u32,
    total_ticks: u64,
    // Tick-rate measurement
    window_ticks: u32,
    window_time: f32,
    measured_hz: f32,
}

impl SimulationClock {
    pub fn new(tick_hz: f32) -> Self {
        Self {
            tick_dt: 1.0 / tick_hz,
            accumulator: 0.0,
            max_substeps: MAX_SUBSTEPS,
            total_ticks: 0,
            window_ticks: 0,
            window_time: 0.0,
            measured_hz: tick_hz,
        }
    }

    /// Account for `frame_dt` seconds of real time and return how many ticks
    /// to run now. Long frames are clamped and capped at `MAX_SUBSTEPS`.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.tick_dt && substeps < self.max_substeps {
            self.accumulator -= self.tick_dt;
            substeps += 1;
        }
        if self.accumulator >= self.tick_dt {
            // Drop the backlog instead of spiralling
            log::debug!("Clock behind by {:.3}s, skipping", self.accumulator);
            self.accumulator %= self.tick_dt;
        }

        self.total_ticks += substeps as u64;
        self.window_ticks += substeps;
        self.window_time += dt;
        if self.window_time >= MEASURE_WINDOW {
            self.measured_hz = self.window_ticks as f32 / self.window_time;
            self.window_ticks = 0;
            self.window_time = 0.0;
        }

        substeps
    }

    /// Seconds per tick
    pub fn tick_dt(&self) -> f32 {
        self.tick_dt
    }

    /// Fraction of a tick left in the accumulator (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.tick_dt
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Tick rate achieved over the last full measurement window
    pub fn measured_hz(&self) -> f32 {
        self.measured_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_frame_one_tick() {
        let mut clock = SimulationClock::new(60.0);
        assert_eq!(clock.advance(1.0 / 60.0), 1);
        assert_eq!(clock.total_ticks(), 1);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut clock = SimulationClock::new(60.0);
        let mut ticks = 0;
        for _ in 0..144 {
            ticks += clock.advance(1.0 / 144.0);
        }
        // One second of frames at 144 Hz
        assert!((59..=60).contains(&ticks), "ticks {}", ticks);
    }

    #[test]
    fn test_long_frame_clamped() {
        let mut clock = SimulationClock::new(60.0);
        // 0.5 s hitch counts as 0.1 s
        let ticks = clock.advance(0.5);
        assert!((5..=6).contains(&ticks), "ticks {}", ticks);
        assert!(clock.alpha() < 1.0);
    }

    #[test]
    fn test_substeps_capped() {
        let mut clock = SimulationClock::new(240.0);
        // 0.1 s would be 24 ticks
        assert_eq!(clock.advance(0.1), MAX_SUBSTEPS);
        assert!(clock.alpha() < 1.0);
    }

    #[test]
    fn test_negative_frame_ignored() {
        let mut clock = SimulationClock::new(60.0);
        assert_eq!(clock.advance(-1.0), 0);
    }

    #[test]
    fn test_measured_rate() {
        let mut clock = SimulationClock::new(60.0);
        for _ in 0..121 {
            clock.advance(1.0 / 60.0);
        }
        assert!((clock.measured_hz() - 60.0).abs() < 2.0);

        let mut slow = SimulationClock::new(240.0);
        for _ in 0..40 {
            slow.advance(0.1);
        }
        // Capped at 8 ticks per 0.1 s frame
        assert!((slow.measured_hz() - 80.0).abs() < 2.0);
    }
}
