use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::EntityId;

/// The attribute a question compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    #[serde(rename = "population")]
    Population,
    #[serde(rename = "GDP")]
    Gdp,
    #[serde(rename = "area")]
    Area,
}

impl AttributeKind {
    /// Lower-case label used inside sentences ("population", "GDP", "area").
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AttributeKind::Population => "population",
            AttributeKind::Gdp => "GDP",
            AttributeKind::Area => "area",
        }
    }

    /// Label used at the start of a line ("Population", "GDP", "Area").
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            AttributeKind::Population => "Population",
            AttributeKind::Gdp => "GDP",
            AttributeKind::Area => "Area",
        }
    }

    /// Indefinite article preceding the label.
    #[must_use]
    pub fn article(self) -> &'static str {
        match self {
            AttributeKind::Area => "an",
            AttributeKind::Population | AttributeKind::Gdp => "a",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which of the two answer choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("a question cannot compare entity {0} with itself")]
    SameEntity(EntityId),

    #[error("answer {correct} is neither {left} nor {right}")]
    AnswerNotAChoice {
        left: EntityId,
        right: EntityId,
        correct: EntityId,
    },

    #[error("a question set needs at least one question")]
    EmptySet,
}

/// One comparison: two entities, the attribute, and which of them is larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionSpec {
    left: EntityId,
    right: EntityId,
    attribute: AttributeKind,
    correct: EntityId,
}

impl QuestionSpec {
    /// # Errors
    ///
    /// Returns `QuestionError::SameEntity` if both sides are the same entity.
    /// Returns `QuestionError::AnswerNotAChoice` if `correct` is not one of the sides.
    pub fn new(
        left: EntityId,
        right: EntityId,
        attribute: AttributeKind,
        correct: EntityId,
    ) -> Result<Self, QuestionError> {
        if left == right {
            return Err(QuestionError::SameEntity(left));
        }
        if correct != left && correct != right {
            return Err(QuestionError::AnswerNotAChoice {
                left,
                right,
                correct,
            });
        }
        Ok(Self {
            left,
            right,
            attribute,
            correct,
        })
    }

    #[must_use]
    pub fn left(&self) -> EntityId {
        self.left
    }

    #[must_use]
    pub fn right(&self) -> EntityId {
        self.right
    }

    #[must_use]
    pub fn attribute(&self) -> AttributeKind {
        self.attribute
    }

    /// The entity with the larger value, i.e. the answer key.
    #[must_use]
    pub fn correct(&self) -> EntityId {
        self.correct
    }

    /// The entity that is not the answer key.
    #[must_use]
    pub fn smaller(&self) -> EntityId {
        if self.correct == self.left {
            self.right
        } else {
            self.left
        }
    }

    #[must_use]
    pub fn entity(&self, side: Side) -> EntityId {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Which side `id` sits on, if it is part of this question at all.
    #[must_use]
    pub fn side_of(&self, id: EntityId) -> Option<Side> {
        if id == self.left {
            Some(Side::Left)
        } else if id == self.right {
            Some(Side::Right)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_correct(&self, chosen: EntityId) -> bool {
        chosen == self.correct
    }

    /// Prompt shown while the question is open.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("Which has a larger {}?", self.attribute)
    }
}

/// Ordered questions making up one play-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<QuestionSpec>,
}

impl QuestionSet {
    /// # Errors
    ///
    /// Returns `QuestionError::EmptySet` if `questions` is empty.
    pub fn new(questions: Vec<QuestionSpec>) -> Result<Self, QuestionError> {
        if questions.is_empty() {
            return Err(QuestionError::EmptySet);
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&QuestionSpec> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionSpec> {
        self.questions.iter()
    }
}
