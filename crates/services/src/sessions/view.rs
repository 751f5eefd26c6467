use trivia_core::format::format_labelled;
use trivia_core::model::{AttributeKind, EntityId, Outcome, QuestionSpec, Side};

use super::engine::{RevealPhase, SessionEngine, SessionPhase};
use super::progress::SessionProgress;
use crate::error::SessionError;

/// Snapshot of a session for rendering. Owns all of its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub reveal: RevealPhase,
    pub finished: bool,
    pub outcomes: Vec<Outcome>,
    pub progress: SessionProgress,
    /// The open or revealed question; `None` once finished.
    pub question: Option<QuestionView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// One-based position in the set.
    pub number: usize,
    pub prompt: String,
    pub attribute: AttributeKind,
    pub left: SideView,
    pub right: SideView,
}

/// One answer choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideView {
    pub entity: EntityId,
    pub name: String,
    pub flag_code: String,
    /// Only filled while the answer is revealed.
    pub revealed: Option<RevealedSide>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedSide {
    /// Labelled statistic, e.g. "Population: 39.0 million".
    pub statistic: String,
    pub is_answer_key: bool,
    pub is_chosen: bool,
}

impl SessionView {
    pub(crate) fn from_engine(engine: &SessionEngine) -> Result<Self, SessionError> {
        let outcomes = engine.outcomes();
        let answered = outcomes.iter().filter(|o| o.is_answered()).count();
        let progress = SessionProgress {
            total: outcomes.len(),
            answered,
            correct: engine.score(),
            remaining: outcomes.len() - answered,
        };

        let question = match engine.current_question() {
            Some(spec) => Some(QuestionView::build(engine, spec)?),
            None => None,
        };

        Ok(Self {
            phase: engine.phase(),
            reveal: engine.reveal_phase(),
            finished: engine.is_finished(),
            outcomes,
            progress,
            question,
        })
    }
}

impl QuestionView {
    fn build(engine: &SessionEngine, spec: &QuestionSpec) -> Result<Self, SessionError> {
        let index = engine.current_index();
        let chosen = engine.answer(index)?.chosen;
        let revealing = engine.phase() == SessionPhase::Revealing;

        let build_side = |side: Side| -> Result<SideView, SessionError> {
            let id = spec.entity(side);
            let entity = engine.dataset().entity(id)?;
            let revealed = revealing.then(|| RevealedSide {
                statistic: format_labelled(
                    entity,
                    spec.attribute(),
                    engine.settings().unit_system(),
                ),
                is_answer_key: spec.is_correct(id),
                is_chosen: chosen == Some(id),
            });
            Ok(SideView {
                entity: id,
                name: entity.display_name(),
                flag_code: entity.flag_code().to_string(),
                revealed,
            })
        };

        Ok(Self {
            number: index + 1,
            prompt: spec.prompt(),
            attribute: spec.attribute(),
            left: build_side(Side::Left)?,
            right: build_side(Side::Right)?,
        })
    }
}
