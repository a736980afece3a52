mod actions;
mod home;
mod overlays;
mod quiz;
mod results;
mod shell;
mod stats;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use actions::{QuizIntent, use_quiz_dispatch};
pub use home::HomeView;
pub use overlays::{AuthModal, LeaderboardModal, Toast};
pub use quiz::QuizView;
pub use results::ResultsView;
pub use shell::{Header, QuizShell};
pub use stats::StatsView;
