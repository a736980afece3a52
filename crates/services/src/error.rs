//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AttemptError, CredentialsError, SubjectId};

use crate::sessions::{Operation, Screen};

/// Errors emitted by `QuizApi` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(String),
    #[error("login required")]
    Unauthenticated,
    #[error("request rejected with status {status}: {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("backend unavailable: {0}")]
    Backend(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Message supplied by the server in an `{error}` body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Errors emitted by the quiz session controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("another request is still in flight")]
    Busy,
    #[error("{op:?} is not available on the {screen:?} screen")]
    InvalidState { op: Operation, screen: Screen },
    #[error("no subject selected")]
    NoSubjectSelected,
    #[error("unknown subject {0}")]
    UnknownSubject(SubjectId),
    #[error("no quiz in progress")]
    NoActiveAttempt,
    #[error("no questions available for subject")]
    NoQuestions,
    #[error("response arrived after the session moved on")]
    Stale,
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
