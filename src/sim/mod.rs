//! Deterministic simulation module
//!
//! All quiz and effect logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering or platform dependencies

pub mod clock;
pub mod firework;
pub mod particle;
pub mod state;
pub mod tick;

pub use clock::SimulationClock;
pub use firework::{Firework, FireworkSystem};
pub use particle::{BurstProfile, Particle, ParticleKind, ParticleSystem, Rgba, StepContext};
pub use state::{FeedbackState, QuizSession, ResultGrade, RngState, SessionEvent, SessionPhase};
pub use tick::Simulation;
