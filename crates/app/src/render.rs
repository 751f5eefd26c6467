//! Plain-text screens for the terminal driver.

use comfy_table::{Cell, Table};
use services::sessions::{QuestionView, ResultCell, SideView};
use services::{AnswerSummary, ResultRow, SessionView};
use trivia_core::model::Outcome;

fn outcome_mark(outcome: Outcome) -> char {
    match outcome {
        Outcome::Unanswered => '.',
        Outcome::Correct => '+',
        Outcome::Incorrect => 'x',
    }
}

/// e.g. `Question 2 of 5  [+....]`
pub fn status_line(view: &SessionView) -> String {
    let marks: String = view.outcomes.iter().copied().map(outcome_mark).collect();
    match &view.question {
        Some(question) => format!(
            "Question {} of {}  [{marks}]",
            question.number, view.progress.total
        ),
        None => format!("Quiz complete  [{marks}]"),
    }
}

fn choice_line(key: char, side: &SideView) -> String {
    let mut line = format!("  {key}) {} [{}]", side.name, side.flag_code);
    if let Some(revealed) = &side.revealed {
        line.push_str(&format!("  {}", revealed.statistic));
        if revealed.is_answer_key {
            line.push_str("  <- larger");
        }
        if revealed.is_chosen {
            line.push_str("  (your pick)");
        }
    }
    line
}

fn question_block(view: &SessionView, question: &QuestionView) -> String {
    [
        String::new(),
        status_line(view),
        question.prompt.clone(),
        choice_line('1', &question.left),
        choice_line('2', &question.right),
    ]
    .join("\n")
}

pub fn question(view: &SessionView) -> String {
    match &view.question {
        Some(question) => format!(
            "{}\nAnswer with 1 or 2 (r restarts, q quits).",
            question_block(view, question)
        ),
        None => status_line(view),
    }
}

/// The revealed question followed by the explanation sentence.
pub fn reveal(view: &SessionView, summary: &AnswerSummary, auto_advance: bool) -> String {
    let Some(question) = &view.question else {
        return summary.to_string();
    };
    let prompt = if auto_advance {
        "Next question coming up (Enter skips the wait)."
    } else {
        "Press Enter to continue."
    };
    format!("{}\n{summary}\n{prompt}", question_block(view, question))
}

fn result_cell(cell: &ResultCell) -> Cell {
    let mut text = format!("{} [{}]\n{}", cell.name, cell.flag_code, cell.statistic);
    if cell.is_answer_key {
        text.push_str("\nlarger");
    }
    if cell.is_selected {
        text.push_str("\nyour pick");
    }
    Cell::new(text)
}

/// Score line plus one table row per question.
pub fn results(score: usize, total: usize, rows: &[ResultRow]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Left", "Right", "Result"]);

    for row in rows {
        let verdict = match row.outcome {
            Outcome::Correct => "correct",
            Outcome::Incorrect => "incorrect",
            Outcome::Unanswered => "-",
        };
        table.add_row(vec![
            Cell::new(row.number),
            Cell::new(&row.label),
            result_cell(&row.left),
            result_cell(&row.right),
            Cell::new(verdict),
        ]);
    }

    format!("\nScore: {score} out of {total}\n{table}")
}

/// Reminder shown when the input does not fit the current phase.
pub fn hint(view: &SessionView) -> &'static str {
    if view.finished {
        "Play again? Answer y or n."
    } else if view.question.as_ref().is_some_and(|q| q.left.revealed.is_some()) {
        "Press Enter to continue, r to restart or q to quit."
    } else {
        "Answer with 1 or 2, r to restart or q to quit."
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use services::{QuestionBank, ResultAggregator, SessionEngine};
    use trivia_core::dataset::LocationDataset;
    use trivia_core::time::fixed_clock;
    use trivia_core::model::Side;

    use super::*;

    fn engine() -> SessionEngine {
        let dataset = Arc::new(LocationDataset::builtin().unwrap());
        let bank = Arc::new(QuestionBank::builtin(&dataset).unwrap());
        SessionEngine::builder(dataset, bank)
            .with_selector(|_: usize| 0_usize)
            .with_clock(fixed_clock())
            .start()
    }

    #[test]
    fn question_screen_lists_both_choices() {
        let engine = engine();
        let screen = question(&engine.view().unwrap());
        assert!(screen.contains("Question 1 of 5  [.....]"));
        assert!(screen.contains("Which has a larger population?"));
        assert!(screen.contains("1) California (US state)"));
        assert!(screen.contains("2) New Zealand"));
    }

    #[test]
    fn reveal_screen_marks_the_answer_key() {
        let mut engine = engine();
        engine.submit_side(Side::Right).unwrap();
        let view = engine.view().unwrap();
        let summary = engine.answer_summary().unwrap();
        let screen = reveal(&view, &summary, false);

        assert!(screen.contains("[x....]"));
        assert!(screen.contains("<- larger"));
        assert!(screen.contains("(your pick)"));
        assert!(screen.contains("Incorrect!"));
        assert!(screen.ends_with("Press Enter to continue."));
        assert_eq!(hint(&view), "Press Enter to continue, r to restart or q to quit.");
    }

    #[test]
    fn results_screen_has_score_and_rows() {
        let mut engine = engine();
        for _ in 0..5 {
            engine.submit_side(Side::Left).unwrap();
            engine.advance().unwrap();
        }
        let results = ResultAggregator::from_engine(&engine).unwrap();
        let screen = super::results(results.score(), results.total(), &results.rows().unwrap());

        assert!(screen.contains(&format!("Score: {} out of 5", results.score())));
        assert!(screen.contains("Larger population?"));
        assert!(screen.contains("Larger area?"));
        assert!(screen.contains("your pick"));
        assert_eq!(hint(&engine.view().unwrap()), "Play again? Answer y or n.");
    }
}
