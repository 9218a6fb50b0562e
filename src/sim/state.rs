//! Quiz session state machine
//!
//! Idle -> Answering -> ShowingFeedback -> (Answering | Finished).
//! Invalid input is ignored rather than reported; waiting is a tick counter.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::bank::{Label, Question, QuestionBank};

/// Current phase of a quiz session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Title screen, nothing drawn yet
    Idle,
    /// Waiting for an answer to the current question
    Answering,
    /// Answer accepted, feedback overlay counting down
    ShowingFeedback,
    /// All questions answered, results on screen
    Finished,
}

/// Transient answer feedback
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeedbackState {
    pub active: bool,
    pub is_correct: bool,
    /// Where the feedback burst and overlay text originate (pixels)
    pub origin: Vec2,
    pub remaining_ticks: u32,
}

impl FeedbackState {
    /// Overlay text while active
    pub fn text(&self) -> Option<&'static str> {
        match (self.active, self.is_correct) {
            (false, _) => None,
            (true, true) => Some("Correct!"),
            (true, false) => Some("Wrong"),
        }
    }
}

/// Result screen rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultGrade {
    /// 80% or better
    Perfect,
    /// 50% or better
    Good,
    NeedsPractice,
}

impl ResultGrade {
    pub fn from_score(score: u32, total: usize) -> Self {
        let percent = if total == 0 {
            0.0
        } else {
            score as f32 / total as f32 * 100.0
        };
        if percent >= 80.0 {
            ResultGrade::Perfect
        } else if percent >= 50.0 {
            ResultGrade::Good
        } else {
            ResultGrade::NeedsPractice
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ResultGrade::Perfect => "Amazing! A perfect performance!",
            ResultGrade::Good => "Not bad, keep it up!",
            ResultGrade::NeedsPractice => "Needs more practice!",
        }
    }
}

/// Notable session transitions, drained by the host each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Started,
    Restarted,
    Answered { label: Option<Label>, correct: bool },
    /// Feedback expired and the quiz moved on to question `index`
    Advanced { index: usize },
    Finished { score: u32 },
}

/// Undrained events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 64;

/// One run through the drawn questions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    drawn: Vec<Question>,
    current_index: usize,
    score: u32,
    feedback: FeedbackState,
    phase: SessionPhase,
    questions_per_session: usize,
    feedback_ticks: u32,
    /// Pending until `drain_events`; capped at `MAX_PENDING_EVENTS`
    #[serde(skip)]
    events: VecDeque<SessionEvent>,
}

impl QuizSession {
    pub fn new(questions_per_session: usize, feedback_ticks: u32) -> Self {
        Self {
            drawn: Vec::new(),
            current_index: 0,
            score: 0,
            feedback: FeedbackState::default(),
            phase: SessionPhase::Idle,
            questions_per_session: questions_per_session.max(1),
            feedback_ticks: feedback_ticks.max(1),
            events: VecDeque::new(),
        }
    }

    fn record(&mut self, event: SessionEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Draw fresh questions and reset progress
    fn begin<R: Rng + ?Sized>(&mut self, bank: &QuestionBank, rng: &mut R) {
        self.drawn = bank.draw(self.questions_per_session, rng);
        self.current_index = 0;
        self.score = 0;
        self.feedback = FeedbackState::default();
        self.phase = SessionPhase::Answering;
    }

    /// Idle -> Answering. Ignored in any other phase.
    pub fn start<R: Rng + ?Sized>(&mut self, bank: &QuestionBank, rng: &mut R) -> bool {
        if self.phase != SessionPhase::Idle {
            return false;
        }
        self.begin(bank, rng);
        self.record(SessionEvent::Started);
        log::info!("Quiz started ({} questions)", self.drawn.len());
        true
    }

    /// Re-draw and start over from any phase
    pub fn restart<R: Rng + ?Sized>(&mut self, bank: &QuestionBank, rng: &mut R) {
        self.begin(bank, rng);
        self.record(SessionEvent::Restarted);
        log::info!("Quiz restarted");
    }

    /// Accept an answer for the current question. `None` is an unrecognized
    /// label and counts as wrong. Returns correctness when accepted, `None`
    /// when ignored (wrong phase or feedback still showing).
    pub fn submit(&mut self, choice: Option<Label>, origin: Vec2) -> Option<bool> {
        if self.phase != SessionPhase::Answering || self.feedback.active {
            return None;
        }
        let question = self.drawn.get(self.current_index)?;

        let correct = question.is_correct(choice);
        if correct {
            self.score += 1;
        }
        self.feedback = FeedbackState {
            active: true,
            is_correct: correct,
            origin,
            remaining_ticks: self.feedback_ticks,
        };
        self.phase = SessionPhase::ShowingFeedback;
        self.record(SessionEvent::Answered {
            label: choice,
            correct,
        });
        log::debug!(
            "Question {} answered {} ({})",
            self.current_index + 1,
            choice.map_or("?", |l| l.as_str()),
            if correct { "correct" } else { "wrong" }
        );
        Some(correct)
    }

    /// Count down the feedback timer; on expiry advance to the next question
    /// or finish
    pub fn tick_feedback(&mut self) {
        if !self.feedback.active {
            return;
        }
        self.feedback.remaining_ticks = self.feedback.remaining_ticks.saturating_sub(1);
        if self.feedback.remaining_ticks > 0 {
            return;
        }

        self.feedback = FeedbackState::default();
        self.current_index += 1;
        if self.current_index >= self.drawn.len() {
            self.phase = SessionPhase::Finished;
            self.record(SessionEvent::Finished { score: self.score });
            log::info!("Quiz finished: {}/{}", self.score, self.drawn.len());
        } else {
            self.phase = SessionPhase::Answering;
            self.record(SessionEvent::Advanced {
                index: self.current_index,
            });
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.questions_per_session
    }

    pub fn feedback(&self) -> &FeedbackState {
        &self.feedback
    }

    pub fn feedback_ticks(&self) -> u32 {
        self.feedback_ticks
    }

    pub fn drawn(&self) -> &[Question] {
        &self.drawn
    }

    /// The question on screen while answering or showing feedback
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            SessionPhase::Answering | SessionPhase::ShowingFeedback => {
                self.drawn.get(self.current_index)
            }
            _ => None,
        }
    }

    /// Result rating once finished
    pub fn grade(&self) -> Option<ResultGrade> {
        (self.phase == SessionPhase::Finished)
            .then(|| ResultGrade::from_score(self.score, self.questions_per_session))
    }

    /// Finished with at least `threshold` correct
    pub fn is_celebrating(&self, threshold: u32) -> bool {
        self.phase == SessionPhase::Finished && self.score >= threshold
    }

    /// Take pending events, oldest first. Hosts that never drain only see
    /// the most recent `MAX_PENDING_EVENTS`.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
