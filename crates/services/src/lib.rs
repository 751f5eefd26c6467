#![forbid(unsafe_code)]

pub mod bank;
pub mod error;
pub mod sessions;

pub use trivia_core::Clock;
pub use sessions as session;

pub use bank::{QuestionBank, RandomSelector, SeededSelector, SetSelector};
pub use error::{BankError, SessionError};

pub use sessions::{
    AdvanceTicket, AnswerSummary, PercentDiff, ResultAggregator, ResultRow, RevealPhase,
    RevealTimer, SessionEngine, SessionPhase, SessionView, Submission,
};
