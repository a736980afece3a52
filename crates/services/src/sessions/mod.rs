mod service;
mod state;
mod workflow;

pub use crate::error::SessionError;
pub use service::QuizSession;
pub use state::{AuthMode, LeaderboardPanel, Operation, Screen, Ticket};
pub use workflow::{QuizLoopService, SessionCell};
