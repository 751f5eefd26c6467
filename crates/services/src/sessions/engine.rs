use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use trivia_core::Clock;
use trivia_core::dataset::LocationDataset;
use trivia_core::model::{
    AdvanceMode, AnswerRecord, EntityId, Outcome, QuestionSet, QuestionSpec, SessionSettings,
    SessionSummary, Side,
};

use super::summary::AnswerSummary;
use super::view::SessionView;
use crate::bank::{QuestionBank, RandomSelector, SetSelector};
use crate::error::SessionError;

//
// ─── STATES AND COMMANDS ───────────────────────────────────────────────────────
//

/// Where a session is in its question loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// A question is open and no answer has been given.
    AwaitingAnswer,
    /// The current answer and its explanation are shown.
    Revealing,
    /// Every question has been answered and advanced past.
    Finished,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::AwaitingAnswer => f.write_str("awaiting an answer"),
            SessionPhase::Revealing => f.write_str("revealing an answer"),
            SessionPhase::Finished => f.write_str("the session is finished"),
        }
    }
}

/// Whether the answer explanation is currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Hidden,
    Visible,
}

/// Commands that can be rejected by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    SubmitAnswer,
    Advance,
    Summarize,
    Aggregate,
}

impl fmt::Display for SessionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionCommand::SubmitAnswer => f.write_str("answer submitted"),
            SessionCommand::Advance => f.write_str("advance requested"),
            SessionCommand::Summarize => f.write_str("answer summary requested"),
            SessionCommand::Aggregate => f.write_str("results requested"),
        }
    }
}

/// Permission for a delayed auto-advance.
///
/// Only valid for the reveal it was issued for; a restart or a manual advance
/// makes it stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    generation: u64,
    index: usize,
}

impl AdvanceTicket {
    pub(crate) fn new(generation: u64, index: usize) -> Self {
        Self { generation, index }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Result of an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub outcome: Outcome,
    /// Present when the session advances by itself after a delay.
    pub ticket: Option<AdvanceTicket>,
}

//
// ─── BUILDER ───────────────────────────────────────────────────────────────────
//

/// Collects the collaborators of a session before the first set is drawn.
pub struct SessionEngineBuilder {
    dataset: Arc<LocationDataset>,
    bank: Arc<QuestionBank>,
    settings: SessionSettings,
    selector: Box<dyn SetSelector + Send>,
    clock: Clock,
}

impl SessionEngineBuilder {
    #[must_use]
    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_selector(mut self, selector: impl SetSelector + Send + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Draw the first set and open its first question.
    #[must_use]
    pub fn start(mut self) -> SessionEngine {
        let set = self.bank.draw_set(self.selector.as_mut());
        let started_at = self.clock.now();
        info!(
            questions = set.len(),
            units = %self.settings.unit_system(),
            "session started"
        );

        SessionEngine {
            dataset: self.dataset,
            bank: self.bank,
            selector: self.selector,
            settings: self.settings,
            clock: self.clock,
            answers: vec![AnswerRecord::default(); set.len()],
            set,
            current: 0,
            phase: SessionPhase::AwaitingAnswer,
            generation: 0,
            started_at,
            completed_at: None,
        }
    }
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// State machine for one play-through.
///
/// `AwaitingAnswer → Revealing → AwaitingAnswer | Finished`. Commands issued in the
/// wrong phase are rejected with `SessionError::InvalidTransition` and change nothing.
pub struct SessionEngine {
    dataset: Arc<LocationDataset>,
    bank: Arc<QuestionBank>,
    selector: Box<dyn SetSelector + Send>,
    settings: SessionSettings,
    clock: Clock,
    set: QuestionSet,
    current: usize,
    answers: Vec<AnswerRecord>,
    phase: SessionPhase,
    generation: u64,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl SessionEngine {
    /// Start configuring a session with default settings, a random selector and the
    /// system clock.
    #[must_use]
    pub fn builder(dataset: Arc<LocationDataset>, bank: Arc<QuestionBank>) -> SessionEngineBuilder {
        SessionEngineBuilder {
            dataset,
            bank,
            settings: SessionSettings::default(),
            selector: Box::new(RandomSelector),
            clock: Clock::system(),
        }
    }

    #[must_use]
    pub fn dataset(&self) -> &LocationDataset {
        &self.dataset
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub fn question_set(&self) -> &QuestionSet {
        &self.set
    }

    /// Zero-based index of the open question; equals the set length once finished.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuestionSpec> {
        self.set.get(self.current)
    }

    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` past the end of the set.
    pub fn question(&self, index: usize) -> Result<&QuestionSpec, SessionError> {
        self.set.get(index).ok_or(SessionError::IndexOutOfRange {
            index,
            len: self.set.len(),
        })
    }

    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` past the end of the set.
    pub fn answer(&self, index: usize) -> Result<AnswerRecord, SessionError> {
        self.answers
            .get(index)
            .copied()
            .ok_or(SessionError::IndexOutOfRange {
                index,
                len: self.answers.len(),
            })
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn outcomes(&self) -> Vec<Outcome> {
        self.answers.iter().map(|a| a.outcome).collect()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn reveal_phase(&self) -> RevealPhase {
        match self.phase {
            SessionPhase::Revealing => RevealPhase::Visible,
            SessionPhase::AwaitingAnswer | SessionPhase::Finished => RevealPhase::Hidden,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    /// Number of correct answers so far.
    #[must_use]
    pub fn score(&self) -> usize {
        self.answers
            .iter()
            .filter(|a| a.outcome.is_correct())
            .count()
    }

    /// Bumped on every restart; stale advance tickets carry an older value.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Answer the open question with `chosen`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless awaiting an answer.
    /// Returns `SessionError::NotAChoice` if `chosen` is neither side of the question.
    pub fn submit_answer(&mut self, chosen: EntityId) -> Result<Submission, SessionError> {
        if self.phase != SessionPhase::AwaitingAnswer {
            return Err(self.rejected(SessionCommand::SubmitAnswer));
        }
        let index = self.current;
        let question = *self.question(index)?;
        if question.side_of(chosen).is_none() {
            warn!(question = index + 1, %chosen, "answer is not one of the choices");
            return Err(SessionError::NotAChoice {
                chosen,
                number: index + 1,
            });
        }

        let record = AnswerRecord::answered(chosen, question.is_correct(chosen));
        self.answers[index] = record;
        self.phase = SessionPhase::Revealing;
        debug!(question = index + 1, %chosen, outcome = ?record.outcome, "answer recorded");

        let ticket = match self.settings.advance_mode() {
            AdvanceMode::Manual => None,
            AdvanceMode::Auto { .. } => Some(AdvanceTicket::new(self.generation, index)),
        };
        Ok(Submission {
            outcome: record.outcome,
            ticket,
        })
    }

    /// Answer the open question by picking a side.
    ///
    /// # Errors
    ///
    /// See [`SessionEngine::submit_answer`].
    pub fn submit_side(&mut self, side: Side) -> Result<Submission, SessionError> {
        let Some(question) = self.current_question() else {
            return Err(self.rejected(SessionCommand::SubmitAnswer));
        };
        let chosen = question.entity(side);
        self.submit_answer(chosen)
    }

    /// Hide the revealed answer and open the next question, or finish the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless an answer is being revealed.
    pub fn advance(&mut self) -> Result<SessionPhase, SessionError> {
        if self.phase != SessionPhase::Revealing {
            return Err(self.rejected(SessionCommand::Advance));
        }

        self.current += 1;
        if self.current < self.set.len() {
            self.phase = SessionPhase::AwaitingAnswer;
            debug!(question = self.current + 1, "next question");
        } else {
            self.phase = SessionPhase::Finished;
            self.completed_at = Some(self.clock.now());
            info!(
                score = self.score(),
                total = self.set.len(),
                "session finished"
            );
        }
        Ok(self.phase)
    }

    /// Advance for a timer that fired, unless the ticket has gone stale.
    ///
    /// Returns `Ok(false)` and changes nothing when the session was restarted or already
    /// moved on since the ticket was issued.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`SessionEngine::advance`].
    pub fn advance_if_current(&mut self, ticket: AdvanceTicket) -> Result<bool, SessionError> {
        let current = ticket.generation == self.generation
            && ticket.index == self.current
            && self.phase == SessionPhase::Revealing;
        if !current {
            debug!(?ticket, generation = self.generation, "stale advance ticket ignored");
            return Ok(false);
        }
        self.advance().map(|_| true)
    }

    /// Throw the session away and start over on a freshly drawn set.
    ///
    /// Accepted in every phase. Outside `Finished` this is an abrupt reset.
    pub fn restart(&mut self) {
        let abrupt = self.phase != SessionPhase::Finished;
        self.set = self.bank.draw_set(self.selector.as_mut());
        self.answers = vec![AnswerRecord::default(); self.set.len()];
        self.current = 0;
        self.phase = SessionPhase::AwaitingAnswer;
        self.generation = self.generation.wrapping_add(1);
        self.started_at = self.clock.now();
        self.completed_at = None;
        info!(generation = self.generation, abrupt, "session restarted");
    }

    /// Explanation of the answer currently being revealed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless an answer is being revealed.
    pub fn answer_summary(&self) -> Result<AnswerSummary, SessionError> {
        if self.phase != SessionPhase::Revealing {
            return Err(self.rejected(SessionCommand::Summarize));
        }
        self.answer_summary_for(self.current)
    }

    /// Explanation for any question that has been answered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` past the end of the set and
    /// `SessionError::InvalidTransition` for an unanswered question.
    pub fn answer_summary_for(&self, index: usize) -> Result<AnswerSummary, SessionError> {
        let question = self.question(index)?;
        let answer = self.answer(index)?;
        if !answer.outcome.is_answered() {
            return Err(self.rejected(SessionCommand::Summarize));
        }
        AnswerSummary::build(
            &self.dataset,
            question,
            answer.outcome,
            self.settings.unit_system(),
        )
    }

    /// Read-only snapshot for presentation.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Dataset` if a question names an entity missing from the dataset.
    pub fn view(&self) -> Result<SessionView, SessionError> {
        SessionView::from_engine(self)
    }

    /// Score and timing of a finished session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` before the session is finished.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        match (self.phase, self.completed_at) {
            (SessionPhase::Finished, Some(completed_at)) => Ok(SessionSummary::from_answers(
                self.started_at,
                completed_at,
                &self.answers,
            )?),
            _ => Err(self.rejected(SessionCommand::Aggregate)),
        }
    }

    pub(crate) fn rejected(&self, command: SessionCommand) -> SessionError {
        warn!(%command, phase = ?self.phase, "command rejected");
        SessionError::InvalidTransition {
            command,
            phase: self.phase,
        }
    }
}

impl fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("questions", &self.set.len())
            .field("current", &self.current)
            .field("phase", &self.phase)
            .field("generation", &self.generation)
            .field("score", &self.score())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
