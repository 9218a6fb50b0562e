//! Fixed timestep simulation tick
//!
//! `Simulation` is the single owner of the quiz session and every particle
//! source. Input handlers resolve synchronously; `tick` advances the feedback
//! timer first, then ambient, feedback, and firework particles, in that order.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::clock::SimulationClock;
use super::firework::FireworkSystem;
use super::particle::{BurstProfile, Particle, ParticleSystem, Rgba, StepContext};
use super::state::{FeedbackState, QuizSession, ResultGrade, RngState, SessionEvent, SessionPhase};
use crate::bank::{Label, Question, QuestionBank};
use crate::consts::*;
use crate::settings::Settings;

/// Quiz session plus its effects, advanced one fixed tick at a time
#[derive(Debug, Clone)]
pub struct Simulation {
    settings: Settings,
    bank: QuestionBank,
    session: QuizSession,
    ambient: ParticleSystem,
    feedback_particles: ParticleSystem,
    fireworks: FireworkSystem,
    rng_state: RngState,
    rng: Pcg32,
    clock: SimulationClock,
    bounds: Vec2,
    /// Simulation tick counter
    time_ticks: u64,
}

impl Simulation {
    /// Build a simulation in the Idle phase with the ambient field populated.
    /// Settings that fail validation are replaced by the defaults.
    pub fn new(settings: Settings, bank: QuestionBank, seed: u64) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Settings::default()
            }
        };
        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();
        let bounds = Vec2::new(settings.viewport_width, settings.viewport_height);

        let mut ambient = ParticleSystem::new(BurstProfile::AMBIENT);
        ambient.spawn_ambient(settings.ambient_count, bounds, &mut rng);

        log::info!(
            "Simulation ready: {} questions in bank, seed {}, {} Hz, feedback {} ticks",
            bank.len(),
            seed,
            settings.tick_rate_hz,
            settings.feedback_ticks()
        );

        Self {
            session: QuizSession::new(settings.questions_per_session, settings.feedback_ticks()),
            clock: SimulationClock::new(settings.tick_rate_hz),
            ambient,
            feedback_particles: ParticleSystem::new(BurstProfile::FEEDBACK),
            fireworks: FireworkSystem::new(),
            rng_state,
            rng,
            bounds,
            time_ticks: 0,
            settings,
            bank,
        }
    }

    // === Input ===

    /// Leave the title screen. Ignored unless Idle.
    pub fn on_start(&mut self) -> bool {
        self.session.start(&self.bank, &mut self.rng)
    }

    /// Re-draw questions and clear every in-flight effect
    pub fn on_restart(&mut self) {
        self.session.restart(&self.bank, &mut self.rng);
        self.feedback_particles.clear();
        self.fireworks.clear();
    }

    /// Answer the current question. `origin` is where the presentation
    /// layer wants the feedback burst. Returns correctness when accepted.
    pub fn on_submit_answer(&mut self, label: Label, origin: Vec2) -> Option<bool> {
        self.submit(Some(label), origin)
    }

    /// Answer with raw key text; anything that isn't A-D counts as wrong
    pub fn on_submit_key(&mut self, key: &str, origin: Vec2) -> Option<bool> {
        self.submit(Label::parse(key), origin)
    }

    fn submit(&mut self, choice: Option<Label>, origin: Vec2) -> Option<bool> {
        let correct = self.session.submit(choice, origin)?;
        let (count, color) = if correct {
            (FEEDBACK_BURST_CORRECT, Rgba::CORRECT)
        } else {
            (FEEDBACK_BURST_WRONG, Rgba::WRONG)
        };
        self.feedback_particles.spawn_burst(origin, count, color, &mut self.rng);
        Some(correct)
    }

    /// New viewport size; the ambient field is re-seeded to fill it.
    /// Non-finite or non-positive sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            log::warn!("Ignoring invalid viewport size {}x{}", width, height);
            return;
        }
        self.bounds = Vec2::new(width, height);
        self.ambient.clear();
        self.ambient
            .spawn_ambient(self.settings.ambient_count, self.bounds, &mut self.rng);
    }

    // === Stepping ===

    fn step_context(&self) -> StepContext {
        StepContext {
            gravity: GRAVITY,
            scale: self.settings.tick_scale(),
            bounds: self.bounds,
        }
    }

    /// Fireworks launch only on the results screen after a good score
    pub fn celebration_enabled(&self) -> bool {
        self.session
            .is_celebrating(self.settings.celebration_threshold())
    }

    /// Advance exactly one fixed tick
    pub fn tick(&mut self) {
        self.time_ticks += 1;

        // Timers before particles, so an expiring feedback and its burst
        // step in a fixed order
        self.session.tick_feedback();

        let ctx = self.step_context();
        self.ambient.step(&ctx);
        self.feedback_particles.step(&ctx);

        let enabled = self.celebration_enabled();
        self.fireworks.maybe_spawn(
            enabled,
            self.settings.firework_probability_per_tick(),
            self.bounds,
            &mut self.rng,
        );
        self.fireworks.step(&ctx, &mut self.rng);
    }

    /// Run however many ticks `frame_dt` seconds of real time are worth
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        let ticks = self.clock.advance(frame_dt);
        for _ in 0..ticks {
            self.tick();
        }
        ticks
    }

    // === Queries ===

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn current_index(&self) -> usize {
        self.session.current_index()
    }

    pub fn total_questions(&self) -> usize {
        self.session.total()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    pub fn feedback(&self) -> &FeedbackState {
        self.session.feedback()
    }

    pub fn grade(&self) -> Option<ResultGrade> {
        self.session.grade()
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn ambient_particles(&self) -> &ParticleSystem {
        &self.ambient
    }

    pub fn feedback_particles(&self) -> &ParticleSystem {
        &self.feedback_particles
    }

    pub fn fireworks(&self) -> &FireworkSystem {
        &self.fireworks
    }

    /// Everything to draw, back to front: ambient, feedback, fireworks
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.ambient
            .iter()
            .chain(self.feedback_particles.iter())
            .chain(self.fireworks.particles())
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.session.drain_events()
    }
}
