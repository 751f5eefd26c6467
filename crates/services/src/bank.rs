//! Pre-authored question sets and how one is picked for a session.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::debug;

use trivia_core::dataset::LocationDataset;
use trivia_core::model::{AttributeKind, EntityId, QuestionSet, QuestionSpec};

use crate::error::BankError;

const BUILTIN_SETS: &str = include_str!("../data/question_sets.json");

/// Picks which set a session plays.
///
/// `select` receives the number of sets (always at least one) and returns an index;
/// out-of-range answers wrap around.
pub trait SetSelector {
    fn select(&mut self, len: usize) -> usize;
}

impl<F> SetSelector for F
where
    F: FnMut(usize) -> usize,
{
    fn select(&mut self, len: usize) -> usize {
        self(len)
    }
}

/// Uniform pick from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl SetSelector for RandomSelector {
    fn select(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Uniform pick from a seeded RNG, for reproducible play.
#[derive(Debug, Clone)]
pub struct SeededSelector {
    rng: StdRng,
}

impl SeededSelector {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl SetSelector for SeededSelector {
    fn select(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// `[left, right, attribute, correct]` as authored.
#[derive(Debug, Deserialize)]
struct RawQuestion(EntityId, EntityId, AttributeKind, EntityId);

/// Fixed, non-empty collection of question sets.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    sets: Vec<QuestionSet>,
}

impl QuestionBank {
    /// # Errors
    ///
    /// Returns `BankError::Empty` if `sets` is empty.
    pub fn new(sets: Vec<QuestionSet>) -> Result<Self, BankError> {
        if sets.is_empty() {
            return Err(BankError::Empty);
        }
        Ok(Self { sets })
    }

    /// Load the bundled sets and check them against `dataset`.
    ///
    /// # Errors
    ///
    /// Returns `BankError` if the bundled sets are malformed or disagree with the dataset.
    pub fn builtin(dataset: &LocationDataset) -> Result<Self, BankError> {
        let bank = Self::from_json(BUILTIN_SETS)?;
        bank.validate(dataset)?;
        Ok(bank)
    }

    /// Parse sets authored as arrays of `[left, right, attribute, correct]`.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Parse` for malformed JSON, `BankError::Question` for a
    /// structurally invalid question, and `BankError::Empty` for no sets.
    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let raw: Vec<Vec<RawQuestion>> = serde_json::from_str(json)?;
        let mut sets = Vec::with_capacity(raw.len());
        for (set, questions) in raw.into_iter().enumerate() {
            let specs = questions
                .into_iter()
                .enumerate()
                .map(|(question, RawQuestion(left, right, attribute, correct))| {
                    QuestionSpec::new(left, right, attribute, correct).map_err(|source| {
                        BankError::Question {
                            set,
                            question,
                            source,
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let questions = QuestionSet::new(specs).map_err(|source| BankError::Question {
                set,
                question: 0,
                source,
            })?;
            sets.push(questions);
        }
        Self::new(sets)
    }

    /// Check every question against `dataset`.
    ///
    /// Both entities must exist and the answer key must hold the strictly larger value.
    /// Ties are rejected outright since neither side could be scored as correct.
    ///
    /// # Errors
    ///
    /// Returns the first `BankError` found.
    pub fn validate(&self, dataset: &LocationDataset) -> Result<(), BankError> {
        for (set, questions) in self.sets.iter().enumerate() {
            for (question, spec) in questions.iter().enumerate() {
                let lookup = |id: EntityId| {
                    dataset.get(id).ok_or(BankError::UnknownEntity {
                        set,
                        question,
                        id,
                    })
                };
                let larger = lookup(spec.correct())?;
                let smaller = lookup(spec.smaller())?;

                let attribute = spec.attribute();
                let ordering = larger
                    .comparable_value(attribute)
                    .partial_cmp(&smaller.comparable_value(attribute));
                match ordering {
                    Some(Ordering::Greater) => {}
                    Some(Ordering::Equal) => {
                        return Err(BankError::Tie {
                            set,
                            question,
                            left: spec.left(),
                            right: spec.right(),
                            attribute,
                        });
                    }
                    _ => {
                        return Err(BankError::WrongAnswerKey {
                            set,
                            question,
                            correct: spec.correct(),
                            attribute,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    #[must_use]
    pub fn sets(&self) -> &[QuestionSet] {
        &self.sets
    }

    /// Draw one set. Draws are independent, so the same set may come up again.
    pub fn draw_set(&self, selector: &mut dyn SetSelector) -> QuestionSet {
        let index = selector.select(self.sets.len()) % self.sets.len();
        debug!(index, sets = self.sets.len(), "question set drawn");
        self.sets[index].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> LocationDataset {
        LocationDataset::builtin().unwrap()
    }

    #[test]
    fn builtin_bank_matches_dataset() {
        let dataset = dataset();
        let bank = QuestionBank::builtin(&dataset).unwrap();
        assert_eq!(bank.len(), 6);
        assert!(bank.sets().iter().all(|set| set.len() == 5));
    }

    #[test]
    fn every_answer_key_is_strictly_larger() {
        let dataset = dataset();
        let bank = QuestionBank::builtin(&dataset).unwrap();
        for spec in bank.sets().iter().flat_map(QuestionSet::iter) {
            let attribute = spec.attribute();
            let larger = dataset.entity(spec.correct()).unwrap();
            let smaller = dataset.entity(spec.smaller()).unwrap();
            assert!(
                larger.comparable_value(attribute) > smaller.comparable_value(attribute),
                "{spec:?}"
            );
        }
    }

    #[test]
    fn empty_bank_is_rejected() {
        assert!(matches!(QuestionBank::new(Vec::new()), Err(BankError::Empty)));
        assert!(matches!(QuestionBank::from_json("[]"), Err(BankError::Empty)));
    }

    #[test]
    fn wrong_answer_key_is_caught() {
        // Canada has more people than Texas
        let bank = QuestionBank::from_json(r#"[[[10, 27, "population", 27]]]"#).unwrap();
        let err = bank.validate(&dataset()).unwrap_err();
        assert!(matches!(err, BankError::WrongAnswerKey { set: 0, question: 0, .. }));
    }

    #[test]
    fn tied_values_are_rejected() {
        let dataset = LocationDataset::from_json(
            r#"[
                { "id": 1, "type": "US state", "state_name": "East", "flag_code": "e",
                  "population": 500, "gdp_nominal_2022": 1, "area_sq_miles": 1 },
                { "id": 2, "type": "US state", "state_name": "West", "flag_code": "w",
                  "population": 500, "gdp_nominal_2022": 2, "area_sq_miles": 1 }
            ]"#,
        )
        .unwrap();
        let bank = QuestionBank::from_json(r#"[[[1, 2, "population", 1]]]"#).unwrap();
        assert!(matches!(
            bank.validate(&dataset),
            Err(BankError::Tie { .. })
        ));
    }

    #[test]
    fn unknown_entity_is_caught() {
        let bank = QuestionBank::from_json(r#"[[[1, 404, "GDP", 1]]]"#).unwrap();
        assert!(matches!(
            bank.validate(&dataset()),
            Err(BankError::UnknownEntity { id, .. }) if id == EntityId::new(404)
        ));
    }

    #[test]
    fn malformed_question_reports_position() {
        let err = QuestionBank::from_json(r#"[[[1, 2, "GDP", 1], [3, 3, "area", 3]]]"#)
            .unwrap_err();
        assert!(matches!(err, BankError::Question { set: 0, question: 1, .. }));
    }

    #[test]
    fn draw_uses_the_selector_and_wraps() {
        let bank = QuestionBank::builtin(&dataset()).unwrap();
        let mut pick_last = |len: usize| len - 1;
        assert_eq!(bank.draw_set(&mut pick_last), bank.sets()[5]);

        let mut overflow = |len: usize| len + 2;
        assert_eq!(bank.draw_set(&mut overflow), bank.sets()[2]);
    }

    #[test]
    fn seeded_draws_repeat() {
        let bank = QuestionBank::builtin(&dataset()).unwrap();
        let mut a = SeededSelector::new(7);
        let mut b = SeededSelector::new(7);
        for _ in 0..10 {
            assert_eq!(bank.draw_set(&mut a), bank.draw_set(&mut b));
        }
    }
}
