use thiserror::Error;

use crate::model::answer::{AnswerDraft, AnswerError, AnswerVerdict, OptionMark, mark_options};
use crate::model::ids::{QuestionId, SubjectId};
use crate::model::question::Question;
use crate::model::subject::Subject;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("no questions available for subject")]
    NoQuestions,
    #[error("all questions have been answered")]
    Complete,
    #[error("questions remain unanswered ({answered} of {total})")]
    Incomplete { answered: usize, total: usize },
    #[error("an answer is already being submitted")]
    SubmissionInFlight,
    #[error("no answer is being submitted")]
    NoSubmissionInFlight,
    #[error(transparent)]
    Answer(#[from] AnswerError),
}

/// Value sent to the server for the question on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAnswer {
    pub question_id: QuestionId,
    pub answer: String,
}

/// Payload persisted by the server when an attempt is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSubmission {
    pub subject_id: SubjectId,
    pub score: u32,
    pub total_questions: usize,
}

/// What the user sees after a verdict, until they move on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_index: usize,
    pub submitted: String,
    pub verdict: AnswerVerdict,
    /// One entry per option; empty for `fill` questions.
    pub marks: Vec<OptionMark>,
}

/// One pass through a subject's questions.
///
/// `index` counts answered questions and never exceeds the question count;
/// `score` and `correct` only grow.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizAttempt {
    subject: Subject,
    questions: Vec<Question>,
    index: usize,
    score: u32,
    correct: u32,
    draft: AnswerDraft,
    feedback: Option<AnswerFeedback>,
    in_flight: Option<PendingAnswer>,
}

impl QuizAttempt {
    /// # Errors
    ///
    /// Returns `AttemptError::NoQuestions` for an empty question list.
    pub fn new(subject: Subject, questions: Vec<Question>) -> Result<Self, AttemptError> {
        if questions.is_empty() {
            return Err(AttemptError::NoQuestions);
        }
        Ok(Self {
            subject,
            questions,
            index: 0,
            score: 0,
            correct: 0,
            draft: AnswerDraft::new(),
            feedback: None,
            in_flight: None,
        })
    }

    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Number of answered questions.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn draft(&self) -> &AnswerDraft {
        &self.draft
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.index == self.questions.len()
    }

    /// Position of the question on screen: the one just answered while its
    /// feedback is shown, otherwise the next unanswered one.
    #[must_use]
    pub fn displayed_index(&self) -> usize {
        self.feedback
            .as_ref()
            .map_or(self.index, |feedback| feedback.question_index)
    }

    #[must_use]
    pub fn displayed_question(&self) -> Option<&Question> {
        self.questions.get(self.displayed_index())
    }

    fn editable_question(&self) -> Result<&Question, AttemptError> {
        if self.feedback.is_some() {
            return Err(AnswerError::AlreadyAnswered.into());
        }
        if self.in_flight.is_some() {
            return Err(AttemptError::SubmissionInFlight);
        }
        self.questions.get(self.index).ok_or(AttemptError::Complete)
    }

    /// # Errors
    ///
    /// Fails once the question is answered or while a submission is in flight.
    pub fn select_option(&mut self, option: usize) -> Result<(), AttemptError> {
        let question = self.editable_question()?.clone();
        self.draft.select(&question, option)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Fails once the question is answered or while a submission is in flight.
    pub fn set_fill_text(&mut self, text: &str) -> Result<(), AttemptError> {
        let question = self.editable_question()?.clone();
        self.draft.set_text(&question, text)?;
        Ok(())
    }

    /// Validate the draft and lock the question for submission.
    ///
    /// # Errors
    ///
    /// Returns the validation error without changing any state.
    pub fn begin_submission(&mut self) -> Result<PendingAnswer, AttemptError> {
        let question = self.editable_question()?;
        let answer = self.draft.build(question)?;
        let pending = PendingAnswer {
            question_id: question.id(),
            answer,
        };
        self.in_flight = Some(pending.clone());
        Ok(pending)
    }

    /// Re-enable the submit control after a failed call.
    pub fn abort_submission(&mut self) {
        self.in_flight = None;
    }

    /// Apply the server's verdict and step past the answered question.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NoSubmissionInFlight` if nothing was submitted.
    pub fn record_verdict(&mut self, verdict: AnswerVerdict) -> Result<(), AttemptError> {
        let Some(pending) = self.in_flight.take() else {
            return Err(AttemptError::NoSubmissionInFlight);
        };
        let submitted = pending.answer;
        let question = self
            .questions
            .get(self.index)
            .ok_or(AttemptError::Complete)?;
        let marks = if question.kind().is_choice() {
            mark_options(question.options(), &verdict.correct_answer, &submitted)
        } else {
            Vec::new()
        };

        self.score = self.score.saturating_add(verdict.earned_points);
        if verdict.correct {
            self.correct = self.correct.saturating_add(1);
        }
        self.feedback = Some(AnswerFeedback {
            question_index: self.index,
            submitted,
            verdict,
            marks,
        });
        self.index += 1;
        self.draft = AnswerDraft::new();
        Ok(())
    }

    /// Leave the feedback screen for the next question.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Complete` when no question is left; the quiz must
    /// be finished instead.
    pub fn advance(&mut self) -> Result<(), AttemptError> {
        if self.is_complete() {
            return Err(AttemptError::Complete);
        }
        self.feedback = None;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AttemptError::Incomplete` while questions remain.
    pub fn submission(&self) -> Result<QuizSubmission, AttemptError> {
        if !self.is_complete() {
            return Err(AttemptError::Incomplete {
                answered: self.index,
                total: self.questions.len(),
            });
        }
        Ok(QuizSubmission {
            subject_id: self.subject.id,
            score: self.score,
            total_questions: self.questions.len(),
        })
    }

    /// Summarise a complete attempt with the server-computed percentage.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Incomplete` while questions remain.
    pub fn results(&self, percentage: f64) -> Result<QuizResults, AttemptError> {
        if !self.is_complete() {
            return Err(AttemptError::Incomplete {
                answered: self.index,
                total: self.questions.len(),
            });
        }
        Ok(QuizResults {
            total_questions: self.questions.len(),
            subject: self.subject.clone(),
            score: self.score,
            correct: self.correct,
            percentage,
        })
    }
}

/// Final numbers of a finished attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResults {
    pub subject: Subject,
    pub score: u32,
    pub total_questions: usize,
    pub correct: u32,
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, QuestionType};

    fn attempt(kinds: &[QuestionType]) -> QuizAttempt {
        let questions = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                Question::new(
                    QuestionId::new(i as u64 + 1),
                    format!("Q{i}"),
                    *kind,
                    vec!["A".into(), "B".into()],
                    Difficulty::Easy,
                )
                .unwrap()
            })
            .collect();
        QuizAttempt::new(Subject::new(SubjectId::new(1), "Rust", "Ownership", "🦀"), questions)
            .unwrap()
    }

    fn verdict(correct: bool, points: u32) -> AnswerVerdict {
        AnswerVerdict {
            correct,
            correct_answer: "A".into(),
            earned_points: points,
        }
    }

    #[test]
    fn empty_attempt_is_rejected() {
        let subject = Subject::new(SubjectId::new(1), "Rust", "", "");
        assert_eq!(
            QuizAttempt::new(subject, Vec::new()).unwrap_err(),
            AttemptError::NoQuestions
        );
    }

    #[test]
    fn invalid_draft_leaves_attempt_untouched() {
        let mut attempt = attempt(&[QuestionType::Single]);
        let before = attempt.clone();
        assert_eq!(
            attempt.begin_submission().unwrap_err(),
            AttemptError::Answer(AnswerError::NoSelection)
        );
        assert_eq!(attempt, before);
    }

    #[test]
    fn verdict_accumulates_and_advances() {
        let mut attempt = attempt(&[QuestionType::Single, QuestionType::Fill]);
        attempt.select_option(1).unwrap();
        let pending = attempt.begin_submission().unwrap();
        assert_eq!(pending.answer, "B");
        assert!(attempt.is_submitting());

        attempt.record_verdict(verdict(false, 0)).unwrap();
        let feedback = attempt.feedback().unwrap();
        assert_eq!(
            feedback.marks,
            vec![OptionMark::Correct, OptionMark::IncorrectSelected]
        );
        assert_eq!(attempt.index(), 1);
        assert_eq!(attempt.displayed_index(), 0);
        assert_eq!(
            attempt.select_option(0).unwrap_err(),
            AttemptError::Answer(AnswerError::AlreadyAnswered)
        );

        attempt.advance().unwrap();
        attempt.set_fill_text(" A ").unwrap();
        assert_eq!(attempt.begin_submission().unwrap().answer, "A");
        attempt.record_verdict(verdict(true, 10)).unwrap();
        assert!(attempt.is_complete());
        assert_eq!(attempt.score(), 10);
        assert_eq!(attempt.correct_count(), 1);
        assert_eq!(attempt.advance().unwrap_err(), AttemptError::Complete);

        let submission = attempt.submission().unwrap();
        assert_eq!(submission.score, 10);
        assert_eq!(submission.total_questions, 2);

        let results = attempt.results(50.0).unwrap();
        assert_eq!(results.total_questions, 2);
        assert_eq!(results.correct, 1);
    }

    #[test]
    fn aborted_submission_can_be_retried() {
        let mut attempt = attempt(&[QuestionType::Single]);
        attempt.select_option(0).unwrap();
        attempt.begin_submission().unwrap();
        assert_eq!(
            attempt.begin_submission().unwrap_err(),
            AttemptError::SubmissionInFlight
        );
        attempt.abort_submission();
        assert!(attempt.begin_submission().is_ok());
    }

    #[test]
    fn results_require_completion() {
        let attempt = attempt(&[QuestionType::Single]);
        assert_eq!(
            attempt.results(0.0).unwrap_err(),
            AttemptError::Incomplete {
                answered: 0,
                total: 1
            }
        );
    }
}
