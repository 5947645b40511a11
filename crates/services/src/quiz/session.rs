use chrono::{DateTime, Duration, Utc};

use quiz_core::Clock;
use quiz_core::model::{
    MultipleChoiceQuestion, OptionId, SectionAnswers, SectionId, SectionKind, SectionQuestions,
    StatementId, TrueFalseSet, TruthAnswer,
};
use quiz_core::scoring::{SectionScore, score_section};

use crate::error::SessionError;

/// One attempt at a section: its questions, the cursor and the answers so far.
///
/// Answers live only as long as the session.
#[derive(Debug, Clone)]
pub struct QuizSession {
    section: SectionId,
    questions: SectionQuestions,
    current: usize,
    answers: SectionAnswers,
    clock: Clock,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if there are no questions.
    pub fn new(
        section: SectionId,
        questions: SectionQuestions,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            section,
            questions,
            current: 0,
            answers: SectionAnswers::new(),
            started_at: clock.now(),
            clock,
        })
    }

    #[must_use]
    pub fn section(&self) -> &SectionId {
        &self.section
    }

    #[must_use]
    pub fn kind(&self) -> SectionKind {
        self.questions.kind()
    }

    #[must_use]
    pub fn questions(&self) -> &SectionQuestions {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; sessions are built from a non-empty question list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.len()
    }

    #[must_use]
    pub fn answers(&self) -> &SectionAnswers {
        &self.answers
    }

    #[must_use]
    pub fn choice_question(&self, index: usize) -> Option<&MultipleChoiceQuestion> {
        match &self.questions {
            SectionQuestions::MultipleChoice(q) => q.get(index),
            SectionQuestions::TrueFalse(_) => None,
        }
    }

    #[must_use]
    pub fn true_false_set(&self, index: usize) -> Option<&TrueFalseSet> {
        match &self.questions {
            SectionQuestions::TrueFalse(q) => q.get(index),
            SectionQuestions::MultipleChoice(_) => None,
        }
    }

    /// Choose `option` for the multiple-choice question at `index`, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if `index` is out of range, the question is not
    /// multiple choice, or it does not offer `option`.
    pub fn select_option(&mut self, index: usize, option: OptionId) -> Result<(), SessionError> {
        self.check_index(index)?;
        let question = self
            .choice_question(index)
            .ok_or(SessionError::WrongQuestionKind(index))?;
        if !question.options().iter().any(|o| o.id == option) {
            return Err(SessionError::UnknownOption {
                index,
                option: option.to_string(),
            });
        }
        self.answers.select_option(index, option);
        Ok(())
    }

    /// Record a verdict for one statement of the true/false set at `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if `index` is out of range, the question is not a
    /// true/false set, or the statement is not part of it.
    pub fn set_statement(
        &mut self,
        index: usize,
        statement: StatementId,
        answer: TruthAnswer,
    ) -> Result<(), SessionError> {
        self.check_index(index)?;
        let set = self
            .true_false_set(index)
            .ok_or(SessionError::WrongQuestionKind(index))?;
        if set.truth(&statement).is_none() {
            return Err(SessionError::UnknownStatement {
                index,
                statement: statement.to_string(),
            });
        }
        self.answers.set_statement(index, statement, answer);
        Ok(())
    }

    /// Move to the next question. Returns false on the last one.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move to the previous question. Returns false on the first one.
    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` if there is no question at `index`.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_index(index)?;
        self.current = index;
        Ok(())
    }

    /// A multiple-choice question is answered once an option is chosen; a
    /// true/false set once every statement has a verdict.
    #[must_use]
    pub fn is_answered(&self, index: usize) -> bool {
        match &self.questions {
            SectionQuestions::MultipleChoice(_) => self.answers.choice(index).is_some(),
            SectionQuestions::TrueFalse(sets) => sets.get(index).is_some_and(|set| {
                set.statements()
                    .all(|(id, _)| self.answers.statement(index, id).is_some())
            }),
        }
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        (0..self.len()).filter(|i| self.is_answered(*i)).count()
    }

    /// Time since the session started or was last reset. Display only.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed_since(self.started_at)
    }

    #[must_use]
    pub fn score(&self) -> SectionScore {
        score_section(&self.questions, &self.answers)
    }

    /// Drop every answer and start over from the first question.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.current = 0;
        self.started_at = self.clock.now();
    }

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(SessionError::IndexOutOfRange(index))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{RawMultipleChoice, RawQuestions, RawTrueFalse};
    use quiz_core::time::fixed_clock;
    use std::collections::BTreeMap;

    fn mc_session(count: usize) -> QuizSession {
        let raw = (0..count)
            .map(|i| RawMultipleChoice {
                question_text: format!("Question {i}"),
                options: BTreeMap::from([
                    ("A".to_owned(), "first".to_owned()),
                    ("B".to_owned(), "second".to_owned()),
                ]),
                correct_answer: "A".to_owned(),
            })
            .collect();
        let questions = RawQuestions::MultipleChoice(raw).ingest().unwrap();
        QuizSession::new(SectionId::new("founding"), questions, fixed_clock()).unwrap()
    }

    fn tf_session() -> QuizSession {
        let keys = ["a", "b", "c", "d"];
        let raw = RawTrueFalse {
            question: "Passage".to_owned(),
            statements: keys.iter().map(|k| ((*k).to_owned(), format!("s{k}"))).collect(),
            answer_boolean_map: BTreeMap::from([
                ("a".to_owned(), true),
                ("b".to_owned(), false),
                ("c".to_owned(), true),
                ("d".to_owned(), false),
            ]),
            explanation_map: BTreeMap::new(),
        };
        let questions = RawQuestions::TrueFalse(vec![raw]).ingest().unwrap();
        QuizSession::new(SectionId::new("true-false"), questions, fixed_clock()).unwrap()
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let err = QuizSession::new(
            SectionId::new("a"),
            SectionQuestions::MultipleChoice(vec![]),
            fixed_clock(),
        )
        .unwrap_err();
        assert_eq!(err, SessionError::Empty);
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut session = mc_session(3);
        assert!(!session.previous());
        assert!(session.next());
        assert!(session.next());
        assert!(session.is_last());
        assert!(!session.next());
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.go_to(5), Err(SessionError::IndexOutOfRange(5)));
        session.go_to(0).unwrap();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn choices_are_validated_and_scored() {
        let mut session = mc_session(4);
        session.select_option(0, OptionId::new("A")).unwrap();
        session.select_option(1, OptionId::new("B")).unwrap();
        session.select_option(1, OptionId::new("A")).unwrap();
        assert!(matches!(
            session.select_option(2, OptionId::new("Z")),
            Err(SessionError::UnknownOption { index: 2, .. })
        ));

        assert_eq!(session.answered_count(), 2);
        assert!(!session.is_answered(3));
        assert!((session.score().percent() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn statement_answers_need_a_true_false_set() {
        let mut session = mc_session(1);
        let err = session
            .set_statement(0, StatementId::new("a"), TruthAnswer::True)
            .unwrap_err();
        assert_eq!(err, SessionError::WrongQuestionKind(0));
    }

    #[test]
    fn true_false_set_is_answered_when_every_statement_is() {
        let mut session = tf_session();
        for (key, label) in [("a", "Đúng"), ("b", "Sai"), ("c", "Sai")] {
            let answer: TruthAnswer = label.parse().unwrap();
            session.set_statement(0, StatementId::new(key), answer).unwrap();
        }
        assert!(!session.is_answered(0));

        session
            .set_statement(0, StatementId::new("d"), TruthAnswer::False)
            .unwrap();

        assert!(session.is_answered(0));
        assert!((session.score().percent() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reset_clears_answers_and_cursor() {
        let mut session = mc_session(2);
        session.select_option(0, OptionId::new("A")).unwrap();
        session.next();

        session.reset();

        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.elapsed(), Duration::zero());
    }
}
