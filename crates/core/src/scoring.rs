//! Pure scoring for finished quiz attempts.

use crate::model::{MultipleChoiceQuestion, SectionAnswers, SectionQuestions, TrueFalseSet};

/// Inclusive percentage at which a section counts as passed with a high score.
pub const HIGH_SCORE_THRESHOLD: f64 = 90.0;

#[must_use]
pub fn is_high_score(percent: f64) -> bool {
    percent >= HIGH_SCORE_THRESHOLD
}

//
// ─── MULTIPLE CHOICE ───────────────────────────────────────────────────────────
//

/// Result of scoring a multiple-choice section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceScore {
    pub correct: usize,
    pub incorrect: usize,
    pub total: usize,
    /// `100 * correct / total`; 0 for an empty section.
    pub percent: f64,
}

/// Count selected options that match each question's correct option.
/// Unanswered questions count as incorrect.
#[must_use]
pub fn score_multiple_choice(
    questions: &[MultipleChoiceQuestion],
    answers: &SectionAnswers,
) -> ChoiceScore {
    let total = questions.len();
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(index, q)| answers.choice(*index).is_some_and(|sel| q.is_correct(sel)))
        .count();

    #[allow(clippy::cast_precision_loss)]
    let percent = if total == 0 {
        0.0
    } else {
        100.0 * correct as f64 / total as f64
    };

    ChoiceScore {
        correct,
        incorrect: total - correct,
        total,
        percent,
    }
}

//
// ─── TRUE / FALSE ──────────────────────────────────────────────────────────────
//

/// Points for one true/false set given how many statements were wrong.
///
/// The table is fixed: 0 wrong → 20, 1 → 10, 2 → 5, 3 → 2, anything else
/// (including all wrong) → 0. The rows are checked in that order, so a
/// three-statement set with every answer wrong still earns 2.
#[must_use]
pub fn true_false_points(incorrect: usize) -> u32 {
    match incorrect {
        0 => 20,
        1 => 10,
        2 => 5,
        3 => 2,
        _ => 0,
    }
}

/// Result of scoring a true/false section.
#[derive(Debug, Clone, PartialEq)]
pub struct TrueFalseScore {
    /// Wrong-statement count per set, in question order.
    pub incorrect_per_question: Vec<usize>,
    pub points_per_question: Vec<u32>,
    pub total_points: u32,
    /// Equal to `total_points`.
    pub percent: f64,
}

/// Number of statements in `set` whose answer differs from the truth.
/// Unanswered statements count as wrong.
#[must_use]
pub fn incorrect_statements(set: &TrueFalseSet, index: usize, answers: &SectionAnswers) -> usize {
    set.statements()
        .filter(|(id, _)| {
            let expected = set.truth(id);
            let given = answers.statement(index, id).map(|a| a.as_bool());
            given.is_none() || given != expected
        })
        .count()
}

#[must_use]
pub fn score_true_false(sets: &[TrueFalseSet], answers: &SectionAnswers) -> TrueFalseScore {
    let incorrect_per_question: Vec<usize> = sets
        .iter()
        .enumerate()
        .map(|(index, set)| incorrect_statements(set, index, answers))
        .collect();
    let points_per_question: Vec<u32> = incorrect_per_question
        .iter()
        .map(|incorrect| true_false_points(*incorrect))
        .collect();
    let total_points: u32 = points_per_question.iter().sum();

    TrueFalseScore {
        incorrect_per_question,
        points_per_question,
        total_points,
        percent: f64::from(total_points),
    }
}

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq)]
pub enum SectionScore {
    MultipleChoice(ChoiceScore),
    TrueFalse(TrueFalseScore),
}

impl SectionScore {
    #[must_use]
    pub fn percent(&self) -> f64 {
        match self {
            SectionScore::MultipleChoice(s) => s.percent,
            SectionScore::TrueFalse(s) => s.percent,
        }
    }

    #[must_use]
    pub fn is_high_score(&self) -> bool {
        is_high_score(self.percent())
    }
}

#[must_use]
pub fn score_section(questions: &SectionQuestions, answers: &SectionAnswers) -> SectionScore {
    match questions {
        SectionQuestions::MultipleChoice(q) => {
            SectionScore::MultipleChoice(score_multiple_choice(q, answers))
        }
        SectionQuestions::TrueFalse(q) => SectionScore::TrueFalse(score_true_false(q, answers)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::{OptionId, RawMultipleChoice, RawQuestions, RawTrueFalse, StatementId, TruthAnswer};

    fn mc_questions(correct: &[&str]) -> Vec<MultipleChoiceQuestion> {
        let raw = correct
            .iter()
            .enumerate()
            .map(|(i, c)| RawMultipleChoice {
                question_text: format!("Q{i}"),
                options: ["A", "B", "C", "D"]
                    .iter()
                    .map(|k| ((*k).to_string(), format!("option {k}")))
                    .collect(),
                correct_answer: (*c).to_string(),
            })
            .collect();
        match RawQuestions::MultipleChoice(raw).ingest().unwrap() {
            SectionQuestions::MultipleChoice(q) => q,
            SectionQuestions::TrueFalse(_) => unreachable!(),
        }
    }

    fn tf_set(truth: &[(&str, bool)]) -> TrueFalseSet {
        let raw = RawTrueFalse {
            question: "Passage".into(),
            statements: truth
                .iter()
                .map(|(k, _)| ((*k).to_string(), format!("statement {k}")))
                .collect(),
            answer_boolean_map: truth.iter().map(|(k, v)| ((*k).to_string(), *v)).collect(),
            explanation_map: BTreeMap::new(),
        };
        match RawQuestions::TrueFalse(vec![raw]).ingest().unwrap() {
            SectionQuestions::TrueFalse(mut q) => q.remove(0),
            SectionQuestions::MultipleChoice(_) => unreachable!(),
        }
    }

    #[test]
    fn multiple_choice_counts_and_percent() {
        let questions = mc_questions(&["A", "B", "C", "D"]);
        let mut answers = SectionAnswers::new();
        answers.select_option(0, OptionId::new("A"));
        answers.select_option(1, OptionId::new("B"));
        answers.select_option(2, OptionId::new("A"));

        let score = score_multiple_choice(&questions, &answers);

        assert_eq!(score.correct, 2);
        assert_eq!(score.incorrect, 2);
        assert_eq!(score.correct + score.incorrect, score.total);
        assert!((score.percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_multiple_choice_is_zero() {
        let score = score_multiple_choice(&[], &SectionAnswers::new());
        assert_eq!(score.total, 0);
        assert!(score.percent.abs() < f64::EPSILON);
    }

    #[test]
    fn nine_of_ten_is_a_high_score() {
        let questions = mc_questions(&["A"; 10]);
        let mut answers = SectionAnswers::new();
        for i in 0..9 {
            answers.select_option(i, OptionId::new("A"));
        }
        let score = score_section(&SectionQuestions::MultipleChoice(questions), &answers);
        assert!(score.is_high_score());
    }

    #[test]
    fn point_table_for_four_statements() {
        let points: Vec<u32> = (0..=4).map(true_false_points).collect();
        assert_eq!(points, vec![20, 10, 5, 2, 0]);
    }

    #[test]
    fn counts_beyond_table_score_zero() {
        assert_eq!(true_false_points(4), 0);
        assert_eq!(true_false_points(6), 0);
        assert_eq!(true_false_points(usize::MAX), 0);
    }

    #[test]
    fn three_wrong_of_three_uses_the_three_row() {
        let set = tf_set(&[("a", true), ("b", false), ("c", true)]);
        let mut answers = SectionAnswers::new();
        for (key, label) in [("a", "Sai"), ("b", "Đúng"), ("c", "Sai")] {
            answers.set_statement(0, StatementId::new(key), label.parse().unwrap());
        }

        let score = score_true_false(&[set], &answers);

        assert_eq!(score.incorrect_per_question, vec![3]);
        assert_eq!(score.points_per_question, vec![2]);
    }

    #[test]
    fn one_wrong_statement_scores_ten() {
        let set = tf_set(&[("a", true), ("b", false), ("c", true), ("d", false)]);
        let mut answers = SectionAnswers::new();
        for (key, label) in [("a", "Đúng"), ("b", "Đúng"), ("c", "Đúng"), ("d", "Sai")] {
            let verdict: TruthAnswer = label.parse().unwrap();
            answers.set_statement(0, StatementId::new(key), verdict);
        }

        let score = score_true_false(std::slice::from_ref(&set), &answers);

        assert_eq!(score.incorrect_per_question, vec![1]);
        assert_eq!(score.points_per_question, vec![10]);
        assert!((score.percent - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unanswered_statements_are_wrong() {
        let set = tf_set(&[("a", true), ("b", false), ("c", true), ("d", false)]);
        let mut answers = SectionAnswers::new();
        answers.set_statement(0, StatementId::new("a"), TruthAnswer::True);

        assert_eq!(incorrect_statements(&set, 0, &answers), 3);
    }

    #[test]
    fn five_perfect_sets_sum_to_one_hundred() {
        let truth = [("a", true), ("b", false), ("c", true), ("d", false)];
        let sets: Vec<TrueFalseSet> = (0..5).map(|_| tf_set(&truth)).collect();
        let mut answers = SectionAnswers::new();
        for index in 0..5 {
            for (key, value) in truth {
                answers.set_statement(index, StatementId::new(key), TruthAnswer::from(value));
            }
        }

        let score = score_section(&SectionQuestions::TrueFalse(sets), &answers);

        assert!((score.percent() - 100.0).abs() < f64::EPSILON);
        assert!(score.is_high_score());
    }
}
