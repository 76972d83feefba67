use log::debug;
use thiserror::Error;

use super::{Question, Quiz};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// no quiz loaded
    Idle,
    InProgress,
    /// every question answered
    Complete,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Please select an answer before submitting.")]
    NoAnswerSelected,

    #[error("there is no question waiting for an answer")]
    NotInProgress,

    #[error("the quiz is not complete yet")]
    NotComplete,
}

/// Outcome of one answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub correct: bool,
    pub expected: String,
    pub phase: Phase,
}

/// Progress through one quiz: which question is up and how many were answered right.
///
/// `current_index` never exceeds the quiz length and `score` never exceeds
/// `current_index`.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    quiz: Option<Quiz>,
    current_index: usize,
    score: usize,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match &self.quiz {
            None => Phase::Idle,
            Some(quiz) if self.current_index < quiz.len() => Phase::InProgress,
            Some(_) => Phase::Complete,
        }
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Number of questions in the loaded quiz, 0 when idle.
    pub fn total(&self) -> usize {
        self.quiz.as_ref().map_or(0, Quiz::len)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.as_ref()?.get(self.current_index)
    }

    /// Replaces whatever quiz was loaded and starts again from the first question.
    pub fn load_quiz(&mut self, quiz: Quiz) -> Phase {
        debug!("loading quiz with {} questions", quiz.len());
        self.quiz = Some(quiz);
        self.current_index = 0;
        self.score = 0;
        self.phase()
    }

    /// Grades `chosen` against the current question by exact text match and
    /// moves on. Without a choice nothing changes.
    pub fn submit_answer(&mut self, chosen: Option<&str>) -> Result<Grade, SessionError> {
        let question = self.current_question().ok_or(SessionError::NotInProgress)?;
        let chosen = chosen.ok_or(SessionError::NoAnswerSelected)?;

        let correct = chosen == question.correct;
        let expected = question.correct.clone();

        if correct {
            self.score += 1;
        }
        self.current_index += 1;

        let phase = self.phase();
        debug!(
            "answered question {}: correct={}, score={}",
            self.current_index, correct, self.score
        );

        Ok(Grade {
            correct,
            expected,
            phase,
        })
    }

    /// Drops a finished quiz.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.phase() != Phase::Complete {
            return Err(SessionError::NotComplete);
        }

        self.quiz = None;
        self.current_index = 0;
        self.score = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn question(mcq: &str, options: [&str; 4], correct: &str) -> Question {
        Question {
            mcq: mcq.to_string(),
            options: ["a", "b", "c", "d"]
                .iter()
                .zip(options)
                .map(|(label, text)| (label.to_string(), text.to_string()))
                .collect::<BTreeMap<_, _>>(),
            correct: correct.to_string(),
        }
    }

    fn arithmetic_quiz() -> Quiz {
        Quiz::new(vec![question("2+2?", ["3", "4", "5", "6"], "4")])
    }

    fn three_questions() -> Quiz {
        Quiz::new(vec![
            question("2+2?", ["3", "4", "5", "6"], "4"),
            question("3*3?", ["6", "9", "12", "33"], "9"),
            question("10/2?", ["2", "5", "8", "20"], "5"),
        ])
    }

    #[test]
    fn starts_idle() {
        let session = QuizSession::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.total(), 0);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn correct_answer_scores() {
        let mut session = QuizSession::new();
        assert_eq!(session.load_quiz(arithmetic_quiz()), Phase::InProgress);

        let grade = session.submit_answer(Some("4")).unwrap();
        assert!(grade.correct);
        assert_eq!(grade.phase, Phase::Complete);
        assert_eq!(session.score(), 1);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.phase(), Phase::Complete);
    }

    #[test]
    fn wrong_answer_still_advances() {
        let mut session = QuizSession::new();
        session.load_quiz(arithmetic_quiz());

        let grade = session.submit_answer(Some("3")).unwrap();
        assert!(!grade.correct);
        assert_eq!(grade.expected, "4");
        assert_eq!(session.score(), 0);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.phase(), Phase::Complete);
    }

    #[test]
    fn grading_is_exact() {
        let mut session = QuizSession::new();
        session.load_quiz(Quiz::new(vec![question(
            "Capital of France?",
            ["Paris", "Lyon", "Nice", "Lille"],
            "Paris",
        )]));

        assert!(!session.submit_answer(Some("paris ")).unwrap().correct);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn missing_choice_changes_nothing() {
        let mut session = QuizSession::new();
        session.load_quiz(three_questions());
        session.submit_answer(Some("4")).unwrap();

        assert_eq!(
            session.submit_answer(None),
            Err(SessionError::NoAnswerSelected)
        );
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.score(), 1);
        assert_eq!(session.phase(), Phase::InProgress);
    }

    #[test]
    fn n_answers_complete_a_quiz_of_n() {
        let mut session = QuizSession::new();
        session.load_quiz(three_questions());

        let answers = ["4", "6", "5"];
        for (i, answer) in answers.into_iter().enumerate() {
            assert_eq!(session.phase(), Phase::InProgress);
            assert_eq!(session.current_index(), i);
            session.submit_answer(Some(answer)).unwrap();
            assert!(session.score() <= session.current_index());
        }

        assert_eq!(session.phase(), Phase::Complete);
        assert_eq!(session.current_index(), 3);
        assert_eq!(session.score(), 2);
        assert_eq!(
            session.submit_answer(Some("4")),
            Err(SessionError::NotInProgress)
        );
        assert_eq!(session.current_index(), 3);
    }

    #[test]
    fn empty_quiz_is_complete_immediately() {
        let mut session = QuizSession::new();
        assert_eq!(session.load_quiz(Quiz::default()), Phase::Complete);
        assert_eq!(session.total(), 0);
    }

    #[test]
    fn loading_resets_progress() {
        let mut session = QuizSession::new();
        session.load_quiz(three_questions());
        session.submit_answer(Some("4")).unwrap();
        session.submit_answer(Some("9")).unwrap();

        session.load_quiz(arithmetic_quiz());
        assert_eq!(session.score(), 0);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.total(), 1);
        assert_eq!(session.phase(), Phase::InProgress);
    }

    #[test]
    fn submitting_while_idle_is_rejected() {
        let mut session = QuizSession::new();
        assert_eq!(
            session.submit_answer(Some("4")),
            Err(SessionError::NotInProgress)
        );
    }

    #[test]
    fn restart_only_after_completion() {
        let mut session = QuizSession::new();
        session.load_quiz(arithmetic_quiz());
        assert_eq!(session.restart(), Err(SessionError::NotComplete));
        assert_eq!(session.phase(), Phase::InProgress);

        session.submit_answer(Some("4")).unwrap();
        session.restart().unwrap();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.quiz().is_none());
        assert_eq!(session.score(), 0);
    }
}
