#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use api::{ApiConfig, Endpoint, HttpQuizApi, InMemoryQuizApi, QuizApi};
pub use error::{ApiError, SessionError};
pub use sessions::{
    AuthMode, LeaderboardPanel, Operation, QuizLoopService, QuizSession, Screen, SessionCell,
    Ticket,
};
