use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::EntityId;

/// Result of a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Unanswered,
    Correct,
    Incorrect,
}

impl Outcome {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Outcome::Correct)
    }

    #[must_use]
    pub fn is_answered(self) -> bool {
        !matches!(self, Outcome::Unanswered)
    }
}

/// What the player did on one question.
///
/// The chosen entity is kept alongside the outcome so the selected side never has to be
/// inferred from whether the answer was right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnswerRecord {
    pub outcome: Outcome,
    pub chosen: Option<EntityId>,
}

impl AnswerRecord {
    #[must_use]
    pub fn answered(chosen: EntityId, correct: bool) -> Self {
        Self {
            outcome: if correct {
                Outcome::Correct
            } else {
                Outcome::Incorrect
            },
            chosen: Some(chosen),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many answers for a single session: {len}")]
    TooManyAnswers { len: usize },

    #[error("question {number} was never answered")]
    Unanswered { number: usize },
}

/// Aggregate result of a finished play-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total: u32,
    correct: u32,
}

impl SessionSummary {
    /// Build a summary from the per-question answers of a finished session.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SessionSummaryError::Unanswered` if any question has no answer.
    /// Returns `SessionSummaryError::TooManyAnswers` if the count cannot fit in `u32`.
    pub fn from_answers(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        answers: &[AnswerRecord],
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        if let Some(index) = answers.iter().position(|a| !a.outcome.is_answered()) {
            return Err(SessionSummaryError::Unanswered { number: index + 1 });
        }

        let total = u32::try_from(answers.len())
            .map_err(|_| SessionSummaryError::TooManyAnswers { len: answers.len() })?;
        let mut correct = 0_u32;
        for answer in answers {
            if answer.outcome.is_correct() {
                correct = correct.saturating_add(1);
            }
        }

        Ok(Self {
            started_at,
            completed_at,
            total,
            correct,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.total - self.correct
    }
}
