use std::fmt;

use trivia_core::dataset::LocationDataset;
use trivia_core::format::{format_entity_statistic, format_percent, percent_difference};
use trivia_core::model::{AttributeKind, EntityId, Outcome, QuestionSpec, UnitSystem};

use crate::error::SessionError;

/// How much larger the winning value is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentDiff {
    Percent(f64),
    /// The smaller value is zero, so no percentage exists.
    NotComparable,
}

/// Explanation shown after a question is answered.
///
/// `Display` renders the full sentence, e.g.
/// "Correct! Japan has a GDP of $4.23 trillion, which is 4% larger than Germany's GDP of $4.07 trillion."
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSummary {
    pub outcome: Outcome,
    pub attribute: AttributeKind,
    pub larger: EntityId,
    pub larger_name: String,
    pub larger_display: String,
    pub smaller: EntityId,
    pub smaller_name: String,
    pub smaller_display: String,
    pub percent: PercentDiff,
}

impl AnswerSummary {
    pub(crate) fn build(
        dataset: &LocationDataset,
        question: &QuestionSpec,
        outcome: Outcome,
        units: UnitSystem,
    ) -> Result<Self, SessionError> {
        let attribute = question.attribute();
        let larger = dataset.entity(question.correct())?;
        let smaller = dataset.entity(question.smaller())?;

        let percent = percent_difference(
            larger.comparable_value(attribute),
            smaller.comparable_value(attribute),
        )
        .map_or(PercentDiff::NotComparable, PercentDiff::Percent);

        Ok(Self {
            outcome,
            attribute,
            larger: larger.id(),
            larger_name: larger.display_name(),
            larger_display: format_entity_statistic(larger, attribute, units),
            smaller: smaller.id(),
            smaller_name: smaller.display_name(),
            smaller_display: format_entity_statistic(smaller, attribute, units),
            percent,
        })
    }

    #[must_use]
    pub fn verdict(&self) -> &'static str {
        if self.outcome.is_correct() {
            "Correct!"
        } else {
            "Incorrect!"
        }
    }
}

impl fmt::Display for AnswerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} has {} {} of {}, ",
            self.verdict(),
            self.larger_name,
            self.attribute.article(),
            self.attribute,
            self.larger_display
        )?;
        match self.percent {
            PercentDiff::Percent(percent) => {
                write!(f, "which is {} larger than ", format_percent(percent))?;
            }
            PercentDiff::NotComparable => f.write_str("which is not comparable to ")?,
        }
        write!(
            f,
            "{}'s {} of {}.",
            self.smaller_name, self.attribute, self.smaller_display
        )
    }
}
