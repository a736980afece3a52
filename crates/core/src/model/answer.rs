use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::question::{Question, QuestionType};

/// Separator used for multi-option answers, both submitted and canonical.
pub const ANSWER_DELIMITER: &str = ",";

/// Local answer validation failures. None of these reach the server.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("no option selected")]
    NoSelection,
    #[error("multiple-choice answer needs at least one option")]
    EmptySelection,
    #[error("answer text is empty")]
    EmptyText,
    #[error("option {index} is out of range ({len} options)")]
    OptionOutOfRange { index: usize, len: usize },
    #[error("question does not take options")]
    NotAChoiceQuestion,
    #[error("question takes options, not text")]
    NotAFillQuestion,
    #[error("question has already been answered")]
    AlreadyAnswered,
}

impl AnswerError {
    /// User-facing text for the notification area.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::NoSelection => "Please select an answer!",
            Self::EmptySelection => "Please select at least one answer!",
            Self::EmptyText => "Please enter an answer!",
            Self::OptionOutOfRange { .. } | Self::NotAChoiceQuestion | Self::NotAFillQuestion => {
                "That option is not available for this question."
            }
            Self::AlreadyAnswered => "This question has already been answered.",
        }
    }
}

/// Input-widget state for the question on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerDraft {
    selected: BTreeSet<usize>,
    text: String,
}

impl AnswerDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Click on option `index`: radio semantics for `single`, checkbox for `multiple`.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::NotAChoiceQuestion` for `fill` questions and
    /// `AnswerError::OptionOutOfRange` for an unknown option.
    pub fn select(&mut self, question: &Question, index: usize) -> Result<(), AnswerError> {
        let len = question.options().len();
        match question.kind() {
            QuestionType::Fill => return Err(AnswerError::NotAChoiceQuestion),
            _ if index >= len => return Err(AnswerError::OptionOutOfRange { index, len }),
            QuestionType::Single => {
                self.selected.clear();
                self.selected.insert(index);
            }
            QuestionType::Multiple => {
                if !self.selected.remove(&index) {
                    self.selected.insert(index);
                }
            }
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AnswerError::NotAFillQuestion` for choice questions.
    pub fn set_text(&mut self, question: &Question, text: &str) -> Result<(), AnswerError> {
        if question.kind() != QuestionType::Fill {
            return Err(AnswerError::NotAFillQuestion);
        }
        self.text = text.to_string();
        Ok(())
    }

    /// Produce the wire value for this draft.
    ///
    /// Multiple selections are joined in option order, not click order.
    ///
    /// # Errors
    ///
    /// Returns the validation error matching the question type when the draft
    /// is incomplete.
    pub fn build(&self, question: &Question) -> Result<String, AnswerError> {
        match question.kind() {
            QuestionType::Single => {
                let index = self
                    .selected
                    .iter()
                    .next()
                    .copied()
                    .ok_or(AnswerError::NoSelection)?;
                option_label(question, index).map(ToString::to_string)
            }
            QuestionType::Multiple => {
                if self.selected.is_empty() {
                    return Err(AnswerError::EmptySelection);
                }
                let labels = self
                    .selected
                    .iter()
                    .map(|&index| option_label(question, index))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(labels.join(ANSWER_DELIMITER))
            }
            QuestionType::Fill => {
                let trimmed = self.text.trim();
                if trimmed.is_empty() {
                    return Err(AnswerError::EmptyText);
                }
                Ok(trimmed.to_string())
            }
        }
    }
}

fn option_label(question: &Question, index: usize) -> Result<&str, AnswerError> {
    question
        .options()
        .get(index)
        .map(String::as_str)
        .ok_or(AnswerError::OptionOutOfRange {
            index,
            len: question.options().len(),
        })
}

/// The server's judgement on one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerVerdict {
    pub correct: bool,
    pub correct_answer: String,
    pub earned_points: u32,
}

/// Highlight applied to a choice option once the verdict is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Neutral,
    Correct,
    IncorrectSelected,
}

fn split_answer(answer: &str) -> Vec<String> {
    answer
        .split(ANSWER_DELIMITER)
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Mark each option against the canonical answer and what was submitted.
///
/// Comparison is case-insensitive on trimmed labels.
#[must_use]
pub fn mark_options(options: &[String], correct_answer: &str, submitted: &str) -> Vec<OptionMark> {
    let correct = split_answer(correct_answer);
    let chosen = split_answer(submitted);
    options
        .iter()
        .map(|option| {
            let value = option.trim().to_lowercase();
            if correct.contains(&value) {
                OptionMark::Correct
            } else if chosen.contains(&value) {
                OptionMark::IncorrectSelected
            } else {
                OptionMark::Neutral
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, QuestionId};

    fn question(kind: QuestionType, options: &[&str]) -> Question {
        Question::new(
            QuestionId::new(1),
            "Which?",
            kind,
            options.iter().map(ToString::to_string).collect(),
            Difficulty::Easy,
        )
        .unwrap()
    }

    #[test]
    fn single_without_selection_is_rejected() {
        let q = question(QuestionType::Single, &["A", "B"]);
        assert_eq!(AnswerDraft::new().build(&q), Err(AnswerError::NoSelection));
    }

    #[test]
    fn single_selection_replaces_previous() {
        let q = question(QuestionType::Single, &["A", "B", "C"]);
        let mut draft = AnswerDraft::new();
        draft.select(&q, 0).unwrap();
        draft.select(&q, 2).unwrap();
        assert!(!draft.is_selected(0));
        assert_eq!(draft.build(&q).unwrap(), "C");
    }

    #[test]
    fn multiple_joins_in_option_order() {
        let q = question(QuestionType::Multiple, &["London", "Paris", "Rome", "Berlin"]);
        let mut draft = AnswerDraft::new();
        draft.select(&q, 3).unwrap();
        draft.select(&q, 1).unwrap();
        assert_eq!(draft.build(&q).unwrap(), "Paris,Berlin");
    }

    #[test]
    fn multiple_toggle_can_empty_selection() {
        let q = question(QuestionType::Multiple, &["A", "B"]);
        let mut draft = AnswerDraft::new();
        draft.select(&q, 1).unwrap();
        draft.select(&q, 1).unwrap();
        assert_eq!(draft.build(&q), Err(AnswerError::EmptySelection));
    }

    #[test]
    fn fill_is_trimmed_and_blank_rejected() {
        let q = question(QuestionType::Fill, &[]);
        let mut draft = AnswerDraft::new();
        draft.set_text(&q, "   ").unwrap();
        assert_eq!(draft.build(&q), Err(AnswerError::EmptyText));
        draft.set_text(&q, "  print() ").unwrap();
        assert_eq!(draft.build(&q).unwrap(), "print()");
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let q = question(QuestionType::Single, &["A"]);
        let mut draft = AnswerDraft::new();
        assert_eq!(
            draft.select(&q, 4),
            Err(AnswerError::OptionOutOfRange { index: 4, len: 1 })
        );
    }

    #[test]
    fn marks_correct_and_wrong_choices() {
        let options = vec!["Paris".to_string(), "Berlin".to_string(), "Rome".to_string()];
        let marks = mark_options(&options, "paris, rome", "Paris,Berlin");
        assert_eq!(
            marks,
            vec![OptionMark::Correct, OptionMark::IncorrectSelected, OptionMark::Correct]
        );
    }
}
