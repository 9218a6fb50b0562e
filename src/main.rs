//! Quiz Fireworks entry point
//!
//! Headless driver: plays scripted sessions through the simulation at a
//! fixed frame rate and logs what a renderer would show.
//!
//! Usage: `quiz-fireworks [questions.json]`

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use quiz_fireworks::sim::{SessionEvent, SessionPhase, Simulation};
use quiz_fireworks::{Label, QuestionBank, Settings};

/// Frames to let fireworks play on the results screen
const CELEBRATION_FRAMES: u32 = 240;

/// Where the presentation layer would centre option row `index`
fn option_center(bounds: Vec2, index: usize) -> Vec2 {
    let row_height = 52.0;
    let row_gap = 18.0;
    Vec2::new(
        bounds.x / 2.0,
        240.0 + index as f32 * (row_height + row_gap) + row_height / 2.0,
    )
}

fn run_frames(sim: &mut Simulation, frames: u32, frame_dt: f32) {
    for _ in 0..frames {
        sim.update(frame_dt);
        for event in sim.drain_events() {
            match event {
                SessionEvent::Advanced { index } => {
                    log::info!("Question {} of {}", index + 1, sim.total_questions())
                }
                SessionEvent::Finished { score } => {
                    log::info!("Score {}/{}", score, sim.total_questions())
                }
                other => log::debug!("{:?}", other),
            }
        }
    }
}

/// Answer every question; `skill` picks which answers are right
fn play_session(sim: &mut Simulation, skill: impl Fn(usize) -> bool, frame_dt: f32) {
    let feedback_frames = sim.settings().feedback_ticks() + 1;
    while sim.phase() != SessionPhase::Finished {
        let Some(question) = sim.current_question() else {
            break;
        };
        let index = sim.current_index();
        let right = question.correct;
        let label = if skill(index) {
            right
        } else {
            Label::from_index((right.index() + 1) % Label::ALL.len()).unwrap_or(right)
        };
        log::info!("Q: {} -> {} {}", question.text, label, question.option(label));

        let origin = option_center(sim.bounds(), label.index());
        if let Some(correct) = sim.on_submit_answer(label, origin) {
            if let Some(text) = sim.feedback().text() {
                log::info!("{} ({} particles)", text, sim.feedback_particles().len());
            }
            debug_assert_eq!(correct, skill(index));
        }
        run_frames(sim, feedback_frames, frame_dt);
    }

    if let Some(grade) = sim.grade() {
        log::info!("{}", grade.message());
    }
}

fn main() {
    env_logger::init();
    log::info!("Quiz Fireworks (headless) starting...");

    let settings = Settings::load();
    let bank = match std::env::args().nth(1) {
        Some(path) => match QuestionBank::from_json_file(&path) {
            Ok(bank) => bank,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => QuestionBank::default_bank(),
    };

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    let frame_dt = settings.tick_dt();
    let mut sim = Simulation::new(settings, bank, seed);

    sim.on_start();
    play_session(&mut sim, |_| true, frame_dt);
    run_frames(&mut sim, CELEBRATION_FRAMES, frame_dt);
    log::info!(
        "{} fireworks in flight, {} particles total",
        sim.fireworks().len(),
        sim.particles().count()
    );

    sim.on_restart();
    play_session(&mut sim, |i| i == 0, frame_dt);
    run_frames(&mut sim, CELEBRATION_FRAMES, frame_dt);
    log::info!(
        "{} fireworks in flight after a low score",
        sim.fireworks().len()
    );

    log::info!(
        "Ran {} ticks (measured {:.1} Hz)",
        sim.time_ticks(),
        sim.clock().measured_hz()
    );
}
