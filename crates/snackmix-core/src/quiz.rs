//! Multiple-choice ratio quiz.
//!
//! A quiz offers three candidate percentages for class A, one of which is
//! the answer the image is rendered for. Candidates are spaced by the
//! difficulty's step and stay within [`MIN_PERCENT`, `MAX_PERCENT`].
//!
//! Answers are written as `"{p} % : {100 - p} %"`, e.g. `"30 % : 70 %"`.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest percentage a candidate may take.
pub const MIN_PERCENT: u32 = 10;
/// Largest percentage a candidate may take.
pub const MAX_PERCENT: u32 = 90;

/// Spread of the neighbouring candidates around the first one.
const NEIGHBOUR_SPAN: u32 = 20;

/// Quiz construction and answer parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// Step leaves no room for three candidates
    #[error("Step {0} leaves no room for three candidates")]
    InvalidStep(u32),
    /// Text is not shaped like `"p % : q %"`
    #[error("Malformed answer: {0:?}")]
    MalformedAnswer(String),
}

/// How close the three candidates are to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Candidates 10 points apart
    Beginner,
    /// Candidates 5 points apart
    #[default]
    Intermediate,
    /// Candidates 1 point apart
    Advanced,
}

impl Difficulty {
    /// Percentage step between candidates.
    pub fn step(self) -> u32 {
        match self {
            Difficulty::Beginner => 10,
            Difficulty::Intermediate => 5,
            Difficulty::Advanced => 1,
        }
    }

    /// Parse a difficulty label. Unknown labels fall back to `Intermediate`.
    ///
    /// Accepts the English names (any case) and the labels 初級, 中級, 上級.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "beginner" | "初級" => Difficulty::Beginner,
            "advanced" | "上級" => Difficulty::Advanced,
            _ => Difficulty::Intermediate,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        f.write_str(name)
    }
}

/// Pick uniformly from `start, start + step, ...` strictly below `stop`.
fn pick_stepped<R: Rng + ?Sized>(start: u32, stop: u32, step: u32, rng: &mut R) -> Option<u32> {
    if step == 0 || start >= stop {
        return None;
    }
    let slots = (stop - start).div_ceil(step);
    Some(start + step * rng.random_range(0..slots))
}

/// Draw three distinct candidate percentages `(p1, p2, p3)` with
/// `p3 < p1 < p2`.
///
/// `p2` lies up to 20 points above `p1` and `p3` up to 20 points below,
/// both clipped to the percent bounds.
///
/// # Errors
///
/// Returns `QuizError::InvalidStep` if `step` is zero or too large to fit
/// three candidates between the bounds.
pub fn create_selections<R: Rng + ?Sized>(
    step: u32,
    rng: &mut R,
) -> Result<(u32, u32, u32), QuizError> {
    let invalid = || QuizError::InvalidStep(step);

    let low = MIN_PERCENT.checked_add(step.checked_mul(2).ok_or_else(invalid)?);
    let high = MAX_PERCENT.checked_sub(step.checked_mul(2).ok_or_else(invalid)?);
    let (low, high) = low.zip(high).ok_or_else(invalid)?;
    let p1 = pick_stepped(low, high, step, rng).ok_or_else(invalid)?;

    let up_span = if p1 + NEIGHBOUR_SPAN >= MAX_PERCENT {
        MAX_PERCENT - p1
    } else {
        NEIGHBOUR_SPAN
    };
    let p2 = p1 + pick_stepped(0, up_span, step, rng).ok_or_else(invalid)? + step;

    let down_span = if p1 <= MIN_PERCENT + NEIGHBOUR_SPAN {
        p1 - MIN_PERCENT
    } else {
        NEIGHBOUR_SPAN
    };
    let p3 = p1 - pick_stepped(0, down_span, step, rng).ok_or_else(invalid)? - step;

    Ok((p1, p2, p3))
}

/// Format a class A percentage as an answer string.
pub fn format_answer(percent: u32) -> String {
    format!("{} % : {} %", percent, 100u32.saturating_sub(percent))
}

/// Parse text shaped like `"p % : q %"` into `(p, q)`.
///
/// Only the shape is checked; `p + q` need not be 100. The whole text must
/// match, so trailing characters such as `"30 % : 70 %!"` are rejected.
pub fn parse_answer(text: &str) -> Result<(u32, u32), QuizError> {
    let malformed = || QuizError::MalformedAnswer(text.to_string());

    let (left, right) = text.split_once(" : ").ok_or_else(malformed)?;
    let number = |part: &str| -> Option<u32> {
        let digits = part.strip_suffix(" %")?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    };

    let p = number(left).ok_or_else(malformed)?;
    let q = number(right).ok_or_else(malformed)?;
    Ok((p, q))
}

/// One generated quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub difficulty: Difficulty,
    /// Candidate percentages in presentation order.
    pub choices: [u32; 3],
    /// The correct percentage, one of `choices`.
    pub answer: u32,
}

impl Quiz {
    /// Draw candidates for `difficulty`, pick the answer uniformly among
    /// them and shuffle the presentation order.
    pub fn new<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Result<Self, QuizError> {
        let (p1, p2, p3) = create_selections(difficulty.step(), rng)?;
        let mut choices = [p1, p2, p3];
        let answer = choices[rng.random_range(0..choices.len())];
        choices.shuffle(rng);

        Ok(Self {
            difficulty,
            choices,
            answer,
        })
    }

    /// Fraction of class A the image should show.
    pub fn ratio(&self) -> f64 {
        self.answer as f64 / 100.0
    }

    /// Answer strings in presentation order.
    pub fn labels(&self) -> [String; 3] {
        self.choices.map(format_answer)
    }

    /// The correct answer string.
    pub fn answer_label(&self) -> String {
        format_answer(self.answer)
    }

    /// Check a submitted answer.
    ///
    /// Returns `Err` if `text` is not answer-shaped, otherwise whether it
    /// matches the correct answer exactly.
    pub fn check(&self, text: &str) -> Result<bool, QuizError> {
        parse_answer(text)?;
        Ok(text == self.answer_label())
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
