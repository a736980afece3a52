mod http;
mod memory;
mod wire;

use async_trait::async_trait;
use quiz_core::model::{
    AnswerVerdict, Credentials, LeaderboardEntry, PendingAnswer, Question, QuizSubmission,
    Registration, Subject, SubjectId, SubjectStats, User,
};

use crate::error::ApiError;

pub use http::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, HttpQuizApi};
pub use memory::{DEFAULT_POINTS, InMemoryQuizApi};

/// Each call the client makes against the quiz backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CheckSession,
    Register,
    Login,
    Logout,
    ListSubjects,
    ListQuestions,
    SubmitAnswer,
    FinishQuiz,
    Leaderboard,
    UserStats,
}

/// Contract of the quiz REST backend.
///
/// Implementations parse responses into domain types at the boundary and
/// report schema violations as `ApiError::Malformed`.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// Returns the signed-in user, or `None` when the session is anonymous.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport or schema failures.
    async fn check_session(&self) -> Result<Option<User>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the server message when registration
    /// is refused.
    async fn register(&self, registration: &Registration) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::Rejected` or `ApiError::Unauthenticated` for bad
    /// credentials.
    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` for transport failures.
    async fn logout(&self) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Any non-success status is reported as `ApiError::Unauthenticated`.
    async fn list_subjects(&self) -> Result<Vec<Subject>, ApiError>;

    /// Questions in presentation order. An empty list is a valid answer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport or schema failures.
    async fn list_questions(&self, subject_id: SubjectId) -> Result<Vec<Question>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` for transport or schema failures.
    async fn submit_answer(&self, answer: &PendingAnswer) -> Result<AnswerVerdict, ApiError>;

    /// Persist a finished attempt and return its percentage.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport or schema failures.
    async fn finish_quiz(&self, submission: &QuizSubmission) -> Result<f64, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` for transport or schema failures.
    async fn leaderboard(&self, subject_id: SubjectId) -> Result<Vec<LeaderboardEntry>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` for transport or schema failures.
    async fn user_stats(&self) -> Result<Vec<SubjectStats>, ApiError>;
}
