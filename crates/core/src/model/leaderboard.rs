use chrono::{DateTime, Utc};

/// One ranked row of a subject's leaderboard, best first as served.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub percentage: f64,
    pub completed_at: DateTime<Utc>,
}

/// Aggregate results of the signed-in user for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectStats {
    pub subject: String,
    pub icon: String,
    pub attempts: u32,
    pub best_score: f64,
    pub avg_score: f64,
}
