//! Question records and the read-only question bank
//!
//! The bank is built once at startup (from the built-in set or a JSON file)
//! and only ever read afterwards. Sessions draw from it with a seeded RNG.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Answer option label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    A,
    B,
    C,
    D,
}

impl Label {
    /// All labels in display order
    pub const ALL: [Label; 4] = [Label::A, Label::B, Label::C, Label::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::A => "A",
            Label::B => "B",
            Label::C => "C",
            Label::D => "D",
        }
    }

    /// Parse a label, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Label::A),
            "B" => Some(Label::B),
            "C" => Some(Label::C),
            "D" => Some(Label::D),
            _ => None,
        }
    }

    /// Position of this label in the option list
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Label for an option row (0-3)
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::parse(s).ok_or_else(|| BankError::Parse(format!("unknown label {:?}", s)))
    }
}

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    /// Option texts indexed by `Label::index`
    pub options: [String; 4],
    pub correct: Label,
}

impl Question {
    pub fn new(text: impl Into<String>, options: [&str; 4], correct: Label) -> Self {
        Self {
            text: text.into(),
            options: options.map(String::from),
            correct,
        }
    }

    pub fn option(&self, label: Label) -> &str {
        &self.options[label.index()]
    }

    /// Unknown labels (`None`) never match
    pub fn is_correct(&self, choice: Option<Label>) -> bool {
        choice == Some(self.correct)
    }
}

/// Question as it appears in a bank file
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    text: String,
    options: BTreeMap<String, String>,
    correct: String,
}

impl QuestionRecord {
    fn into_question(self, index: usize) -> Result<Question, BankError> {
        let invalid = |reason: String| BankError::InvalidQuestion { index, reason };

        if self.text.trim().is_empty() {
            return Err(invalid("question text is empty".into()));
        }

        let mut options: [Option<String>; 4] = Default::default();
        for (key, value) in self.options {
            let label = Label::parse(&key)
                .ok_or_else(|| invalid(format!("unknown option key {:?}", key)))?;
            if value.trim().is_empty() {
                return Err(invalid(format!("option {} is empty", label)));
            }
            let slot = &mut options[label.index()];
            if slot.is_some() {
                return Err(invalid(format!("option {} is given more than once", label)));
            }
            *slot = Some(value);
        }

        let [a, b, c, d] = options;
        let options = match (a, b, c, d) {
            (Some(a), Some(b), Some(c), Some(d)) => [a, b, c, d],
            _ => return Err(invalid("all four options A-D are required".into())),
        };

        let correct = Label::parse(&self.correct)
            .ok_or_else(|| invalid(format!("correct answer {:?} is not A-D", self.correct)))?;

        Ok(Question {
            text: self.text,
            options,
            correct,
        })
    }
}

/// Errors raised while building a question bank
#[derive(Debug)]
pub enum BankError {
    /// Bank file could not be read
    Io(io::Error),
    /// Bank file is not valid JSON of the expected shape
    Parse(String),
    /// A bank must hold at least one question
    Empty,
    /// A record is missing text, options, or a valid answer label
    InvalidQuestion { index: usize, reason: String },
}

impl fmt::Display for BankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankError::Io(err) => write!(f, "Question bank IO error: {}", err),
            BankError::Parse(msg) => write!(f, "Question bank parse error: {}", msg),
            BankError::Empty => write!(f, "Question bank is empty"),
            BankError::InvalidQuestion { index, reason } => {
                write!(f, "Question #{} is invalid: {}", index + 1, reason)
            }
        }
    }
}

impl std::error::Error for BankError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BankError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for BankError {
    fn from(err: io::Error) -> Self {
        BankError::Io(err)
    }
}

impl From<serde_json::Error> for BankError {
    fn from(err: serde_json::Error) -> Self {
        BankError::Parse(err.to_string())
    }
}

/// Immutable, non-empty collection of questions
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        Ok(Self { questions })
    }

    /// Parse a JSON array of `{ text, options: {A..D}, correct }` records
    pub fn from_json_str(json: &str) -> Result<Self, BankError> {
        let records: Vec<QuestionRecord> = serde_json::from_str(json)?;
        let questions = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| record.into_question(i))
            .collect::<Result<Vec<_>, _>>()?;
        let bank = Self::new(questions)?;
        log::info!("Loaded {} questions", bank.len());
        Ok(bank)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, BankError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The built-in p5.js beginner set
    pub fn default_bank() -> Self {
        use Label::*;
        let questions = vec![
            Question::new(
                "Which p5.js function runs once for initial setup?",
                ["draw()", "setup()", "preload()", "display()"],
                B,
            ),
            Question::new(
                "Which function draws a rectangle?",
                ["rect()", "circle()", "square()", "box()"],
                A,
            ),
            Question::new(
                "Which function runs continuously to animate?",
                ["loop()", "animate()", "draw()", "update()"],
                C,
            ),
            Question::new(
                "Which function sets the canvas background color?",
                ["color()", "fill()", "stroke()", "background()"],
                D,
            ),
            Question::new(
                "Which function detects a mouse click in p5.js?",
                ["mousePressed()", "mouseClick()", "onClick()", "clickEvent()"],
                A,
            ),
            Question::new(
                "Which function draws a circle?",
                ["circle()", "round()", "ellipse()", "arc()"],
                A,
            ),
            Question::new(
                "Which variable holds the canvas width?",
                ["canvasWidth", "width", "w", "screenWidth"],
                B,
            ),
            Question::new(
                "Which function sets the fill color?",
                ["setColor()", "color()", "fill()", "paint()"],
                C,
            ),
            Question::new(
                "Which function sets the line thickness?",
                ["lineWidth()", "strokeWeight()", "penSize()", "thickness()"],
                B,
            ),
        ];
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Draw `count` questions: shuffle the bank's indices, take the first
    /// `count`, wrapping with repetition when the bank is smaller
    pub fn draw<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Question> {
        let mut order: Vec<usize> = (0..self.questions.len()).collect();
        order.shuffle(rng);
        (0..count)
            .map(|i| self.questions[order[i % order.len()]].clone())
            .collect()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::default_bank()
    }
}
