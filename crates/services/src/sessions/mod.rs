mod engine;
mod progress;
mod results;
mod summary;
mod timer;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use engine::{
    AdvanceTicket, RevealPhase, SessionCommand, SessionEngine, SessionEngineBuilder, SessionPhase,
    Submission,
};
pub use progress::SessionProgress;
pub use results::{ResultAggregator, ResultCell, ResultRow};
pub use summary::{AnswerSummary, PercentDiff};
pub use timer::RevealTimer;
pub use view::{QuestionView, RevealedSide, SessionView, SideView};
