use quiz_core::model::{LeaderboardEntry, SubjectId};

/// The screen the user is on. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    LoggedOut,
    Home,
    Quiz,
    Results,
    Stats,
}

/// Which form the auth overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Every request the session can issue to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CheckSession,
    Register,
    Login,
    Logout,
    LoadSubjects,
    StartQuiz,
    SubmitAnswer,
    FinishQuiz,
    Leaderboard,
    Stats,
}

/// Proof that a request was started, handed back with its response.
///
/// A response whose ticket no longer matches the session is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub(crate) op: Operation,
    pub(crate) generation: u64,
    pub(crate) subject: Option<SubjectId>,
}

impl Ticket {
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.op
    }

    /// Subject the request is about, for quiz and leaderboard requests.
    #[must_use]
    pub fn subject(&self) -> Option<SubjectId> {
        self.subject
    }
}

/// Leaderboard overlay content.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardPanel {
    pub subject: SubjectId,
    pub subject_name: String,
    pub entries: Vec<LeaderboardEntry>,
}
