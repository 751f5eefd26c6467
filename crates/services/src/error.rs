//! Shared error types for the services crate.

use thiserror::Error;

use trivia_core::dataset::DatasetError;
use trivia_core::model::{AttributeKind, EntityId, QuestionError, SessionSummaryError};

use crate::sessions::{SessionCommand, SessionPhase};

/// Errors raised while loading or validating a `QuestionBank`.
///
/// These are configuration errors: they surface at startup, never mid-session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank has no sets")]
    Empty,

    #[error("malformed question bank: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("set {set}, question {question}: {source}")]
    Question {
        set: usize,
        question: usize,
        #[source]
        source: QuestionError,
    },

    #[error("set {set}, question {question}: unknown entity {id}")]
    UnknownEntity {
        set: usize,
        question: usize,
        id: EntityId,
    },

    #[error("set {set}, question {question}: {left} and {right} have the same {attribute}")]
    Tie {
        set: usize,
        question: usize,
        left: EntityId,
        right: EntityId,
        attribute: AttributeKind,
    },

    #[error("set {set}, question {question}: {correct} does not have the larger {attribute}")]
    WrongAnswerKey {
        set: usize,
        question: usize,
        correct: EntityId,
        attribute: AttributeKind,
    },
}

/// Errors emitted by the session engine.
///
/// A rejected command leaves the session exactly as it was.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("{command} while {phase}")]
    InvalidTransition {
        command: SessionCommand,
        phase: SessionPhase,
    },

    #[error("entity {chosen} is not a choice in question {number}")]
    NotAChoice { chosen: EntityId, number: usize },

    #[error("question index {index} is out of range for a set of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}
