//! Session and particle properties over random input scripts

use glam::Vec2;
use proptest::prelude::*;

use quiz_fireworks::consts::*;
use quiz_fireworks::sim::{
    BurstProfile, Firework, ParticleKind, ParticleSystem, Rgba, SessionPhase, Simulation,
    StepContext,
};
use quiz_fireworks::{Label, Question, QuestionBank, Settings};

#[derive(Debug, Clone)]
enum Action {
    Start,
    Restart,
    Submit(Option<Label>),
    Tick(u32),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        1 => Just(Action::Start),
        1 => Just(Action::Restart),
        6 => prop_oneof![
            Just(None),
            Just(Some(Label::A)),
            Just(Some(Label::B)),
            Just(Some(Label::C)),
            Just(Some(Label::D)),
        ]
        .prop_map(Action::Submit),
        6 => (1u32..60).prop_map(Action::Tick),
    ]
}

fn new_sim(seed: u64) -> Simulation {
    Simulation::new(Settings::default(), QuestionBank::default_bank(), seed)
}

proptest! {
    #[test]
    fn score_bounded_and_monotonic_within_session(
        seed in any::<u64>(),
        actions in prop::collection::vec(action(), 1..80),
    ) {
        let mut sim = new_sim(seed);
        let n = sim.total_questions() as u32;
        let mut last_score = 0;

        for action in actions {
            let mut restarted = false;
            match action {
                Action::Start => {
                    sim.on_start();
                }
                Action::Restart => {
                    sim.on_restart();
                    restarted = true;
                }
                Action::Submit(label) => {
                    let origin = Vec2::new(100.0, 100.0);
                    match label {
                        Some(l) => sim.on_submit_answer(l, origin),
                        None => sim.on_submit_key("?", origin),
                    };
                }
                Action::Tick(k) => {
                    for _ in 0..k {
                        sim.tick();
                    }
                }
            }

            let score = sim.score();
            prop_assert!(score <= n);
            if restarted {
                prop_assert_eq!(score, 0);
                prop_assert_eq!(sim.current_index(), 0);
            } else {
                prop_assert!(score >= last_score);
            }
            last_score = score;

            // Index and phase agree
            prop_assert_eq!(
                sim.current_index() == sim.total_questions(),
                sim.phase() == SessionPhase::Finished
            );
            // Score never leads the answered count
            let answered = sim.current_index()
                + usize::from(sim.phase() == SessionPhase::ShowingFeedback);
            prop_assert!(score as usize <= answered);
            prop_assert_eq!(sim.feedback().active, sim.phase() == SessionPhase::ShowingFeedback);
        }
    }

    #[test]
    fn repeated_submit_counts_once(seed in any::<u64>(), repeats in 2usize..10) {
        let mut sim = new_sim(seed);
        sim.on_start();
        let right = sim.current_question().map(|q| q.correct).unwrap_or(Label::A);
        let mut accepted = 0;
        for _ in 0..repeats {
            if sim.on_submit_answer(right, Vec2::ZERO).is_some() {
                accepted += 1;
            }
        }
        prop_assert_eq!(accepted, 1);
        prop_assert_eq!(sim.score(), 1);
    }

    #[test]
    fn burst_lifespans_strictly_decrease(seed in any::<u64>(), count in 1usize..40) {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
        let ctx = StepContext::reference(Vec2::new(800.0, 600.0));
        let mut system = ParticleSystem::new(BurstProfile::DEBRIS);
        system.spawn_burst(Vec2::new(400.0, 300.0), count, Rgba::CORRECT, &mut rng);

        let mut previous: Vec<f32> = system.iter().map(|p| p.lifespan).collect();
        let mut ticks = 0;
        while !system.is_empty() {
            system.step(&ctx);
            ticks += 1;
            // Every burst particle ages identically, so survivors stay aligned
            let current: Vec<f32> = system.iter().map(|p| p.lifespan).collect();
            prop_assert!(current.len() <= previous.len());
            for (now, before) in current.iter().zip(previous.iter()) {
                prop_assert!(now < before);
            }
            previous = current;
            prop_assert!(ticks <= 86);
        }
        // Removed particles never come back
        for _ in 0..10 {
            system.step(&ctx);
            prop_assert!(system.is_empty());
        }
    }

    #[test]
    fn rocket_explodes_in_bounded_ticks(seed in any::<u64>()) {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
        let bounds = Vec2::new(1280.0, 720.0);
        let ctx = StepContext::reference(bounds);
        let mut fw = Firework::launch(bounds, &mut rng);
        let rocket = fw.rocket().unwrap();
        prop_assert_eq!(rocket.kind, ParticleKind::RocketTrail);
        prop_assert!(rocket.vel.y < 0.0);

        let bound = (-rocket.vel.y / GRAVITY.y).ceil() as u32 + 1;
        let mut ticks = 0;
        let mut debris_at_explosion = 0;
        while !fw.is_exploded() {
            if fw.step(&ctx, &mut rng) {
                debris_at_explosion = fw.debris().len();
            }
            ticks += 1;
            prop_assert!(ticks <= bound);
        }
        prop_assert_eq!(debris_at_explosion, FIREWORK_DEBRIS);
    }
}

#[test]
fn nine_question_bank_all_correct_finishes_and_celebrates() {
    let mut sim = new_sim(42);
    assert_eq!(sim.bank().len(), 9);
    sim.on_start();

    let drawn = sim.session().drawn().to_vec();
    assert_eq!(drawn.len(), 4);
    for (i, a) in drawn.iter().enumerate() {
        assert!(drawn[i + 1..].iter().all(|b| b != a), "repeat in draw");
    }

    for _ in 0..4 {
        let right = sim.current_question().unwrap().correct;
        assert_eq!(sim.on_submit_answer(right, Vec2::new(640.0, 266.0)), Some(true));
        for _ in 0..FEEDBACK_DURATION_MS * 60 / 1000 {
            sim.tick();
        }
    }

    assert_eq!(sim.score(), 4);
    assert_eq!(sim.phase(), SessionPhase::Finished);
    assert!(sim.celebration_enabled());
    assert_eq!(sim.on_submit_answer(Label::A, Vec2::ZERO), None);
    assert_eq!(sim.score(), 4);
}

#[test]
fn wrong_first_answer_then_expiry() {
    let mut sim = new_sim(7);
    sim.on_start();
    let right = sim.current_question().unwrap().correct;
    let wrong = Label::ALL.into_iter().find(|l| *l != right).unwrap();
    assert_eq!(sim.on_submit_answer(wrong, Vec2::ZERO), Some(false));
    for _ in 0..sim.settings().feedback_ticks() {
        sim.tick();
    }
    assert_eq!(sim.score(), 0);
    assert_eq!(sim.current_index(), 1);
    assert_eq!(sim.phase(), SessionPhase::Answering);
}

#[test]
fn small_bank_wraps_instead_of_failing() {
    let bank = QuestionBank::new(vec![Question::new(
        "Only question",
        ["yes", "no", "maybe", "never"],
        Label::A,
    )])
    .unwrap();
    let mut sim = Simulation::new(Settings::default(), bank, 3);
    sim.on_start();
    let drawn = sim.session().drawn();
    assert_eq!(drawn.len(), 4);
    assert!(drawn.iter().all(|q| q.text == "Only question"));
}

#[test]
fn double_rate_keeps_wall_clock_feedback() {
    let settings = Settings {
        tick_rate_hz: 120.0,
        ..Default::default()
    };
    let mut sim = Simulation::new(settings, QuestionBank::default_bank(), 5);
    sim.on_start();
    let right = sim.current_question().unwrap().correct;
    sim.on_submit_answer(right, Vec2::ZERO);

    // 0.75 s at 120 Hz
    for _ in 0..89 {
        sim.tick();
    }
    assert!(sim.feedback().active);
    sim.tick();
    assert!(!sim.feedback().active);
    assert_eq!(sim.current_index(), 1);
}
