use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("unknown question type: {0}")]
    UnknownType(String),

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("{kind} question {id} has no options")]
    MissingOptions { id: QuestionId, kind: QuestionType },
}

//
// ─── TYPE & DIFFICULTY ─────────────────────────────────────────────────────────
//

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    /// Exactly one option.
    Single,
    /// One or more options.
    Multiple,
    /// Free text.
    Fill,
}

impl QuestionType {
    #[must_use]
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Single | Self::Multiple)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::Fill => "fill",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multiple" => Ok(Self::Multiple),
            "fill" => Ok(Self::Fill),
            _ => Err(QuestionError::UnknownType(s.to_string())),
        }
    }
}

/// Difficulty label attached by the server. Unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl Difficulty {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Self::Easy,
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Other(raw) => raw,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A question in presentation order. Correctness lives on the server only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    kind: QuestionType,
    options: Vec<String>,
    difficulty: Difficulty,
}

impl Question {
    /// Build a question, checking that choice questions carry options.
    ///
    /// Options given for a `fill` question are dropped.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` for blank text and
    /// `QuestionError::MissingOptions` for a choice question without options.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        kind: QuestionType,
        options: Vec<String>,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        let options = if kind.is_choice() {
            if options.is_empty() {
                return Err(QuestionError::MissingOptions { id, kind });
            }
            options
        } else {
            Vec::new()
        };

        Ok(Self {
            id,
            text,
            kind,
            options,
            difficulty,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }
}
