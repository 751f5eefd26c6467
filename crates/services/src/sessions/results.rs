use trivia_core::format::format_entity_statistic;
use trivia_core::model::{EntityId, Outcome, Side};

use super::engine::{SessionCommand, SessionEngine};
use crate::error::SessionError;

/// One line of the end-of-session table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// One-based question number.
    pub number: usize,
    /// e.g. "Larger population?"
    pub label: String,
    pub outcome: Outcome,
    pub left: ResultCell,
    pub right: ResultCell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCell {
    pub entity: EntityId,
    pub name: String,
    pub flag_code: String,
    pub statistic: String,
    /// This side holds the larger value.
    pub is_answer_key: bool,
    /// The player picked this side.
    pub is_selected: bool,
}

/// Score and per-question rows of a finished session.
#[derive(Debug, Clone, Copy)]
pub struct ResultAggregator<'a> {
    engine: &'a SessionEngine,
}

impl<'a> ResultAggregator<'a> {
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is finished.
    pub fn from_engine(engine: &'a SessionEngine) -> Result<Self, SessionError> {
        if !engine.is_finished() {
            return Err(engine.rejected(SessionCommand::Aggregate));
        }
        Ok(Self { engine })
    }

    /// Number of correct answers.
    #[must_use]
    pub fn score(&self) -> usize {
        self.engine.score()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.engine.question_set().len()
    }

    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` past the end of the set.
    pub fn row(&self, index: usize) -> Result<ResultRow, SessionError> {
        let question = self.engine.question(index)?;
        let answer = self.engine.answer(index)?;
        let units = self.engine.settings().unit_system();

        let cell = |side: Side| -> Result<ResultCell, SessionError> {
            let id = question.entity(side);
            let entity = self.engine.dataset().entity(id)?;
            Ok(ResultCell {
                entity: id,
                name: entity.display_name(),
                flag_code: entity.flag_code().to_string(),
                statistic: format_entity_statistic(entity, question.attribute(), units),
                is_answer_key: question.is_correct(id),
                is_selected: answer.chosen == Some(id),
            })
        };

        Ok(ResultRow {
            number: index + 1,
            label: format!("Larger {}?", question.attribute()),
            outcome: answer.outcome,
            left: cell(Side::Left)?,
            right: cell(Side::Right)?,
        })
    }

    /// # Errors
    ///
    /// Returns `SessionError::Dataset` if a question names an unknown entity.
    pub fn rows(&self) -> Result<Vec<ResultRow>, SessionError> {
        (0..self.total()).map(|index| self.row(index)).collect()
    }
}
