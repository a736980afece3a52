use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;

use quiz_core::Clock;
use quiz_core::model::{
    ANSWER_DELIMITER, AnswerVerdict, Credentials, Difficulty, LeaderboardEntry, PendingAnswer,
    Question, QuestionId, QuestionType, QuizSubmission, Registration, Subject, SubjectId,
    SubjectStats, User,
};

use super::{Endpoint, QuizApi};
use crate::error::ApiError;

/// Points awarded for a correct answer unless a question says otherwise.
pub const DEFAULT_POINTS: u32 = 10;

const LEADERBOARD_LIMIT: usize = 10;

#[derive(Debug, Clone)]
struct Account {
    email: String,
    password: String,
}

#[derive(Debug, Clone)]
struct StoredQuestion {
    question: Question,
    answer: String,
    points: u32,
}

#[derive(Debug, Clone)]
struct AttemptRecord {
    username: String,
    subject_id: SubjectId,
    percentage: f64,
    completed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    signed_in: Option<String>,
    subjects: Vec<Subject>,
    questions: HashMap<SubjectId, Vec<StoredQuestion>>,
    attempts: Vec<AttemptRecord>,
    failures: HashSet<Endpoint>,
    calls: HashMap<Endpoint, usize>,
}

/// Quiz backend kept in process memory.
///
/// Grades answers, keeps attempts and ranks them the way the REST backend
/// does. Used by tests and the `--demo` mode of the desktop app.
#[derive(Clone, Debug, Default)]
pub struct InMemoryQuizApi {
    clock: Clock,
    state: Arc<Mutex<State>>,
}

impl InMemoryQuizApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Register an account up front.
    #[must_use]
    pub fn with_account(self, username: &str, email: &str, password: &str) -> Self {
        if let Ok(mut state) = self.state() {
            state.accounts.insert(
                username.to_string(),
                Account {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            );
        }
        self
    }

    /// Start with a server session already signed in as `username`.
    #[must_use]
    pub fn signed_in_as(self, username: &str) -> Self {
        if let Ok(mut state) = self.state() {
            state.signed_in = Some(username.to_string());
        }
        self
    }

    #[must_use]
    pub fn with_subject(self, subject: Subject) -> Self {
        if let Ok(mut state) = self.state() {
            state.questions.entry(subject.id).or_default();
            state.subjects.push(subject);
        }
        self
    }

    /// Append a question to a subject with its canonical answer.
    #[must_use]
    pub fn with_question(
        self,
        subject_id: SubjectId,
        question: Question,
        answer: impl Into<String>,
        points: u32,
    ) -> Self {
        if let Ok(mut state) = self.state() {
            state
                .questions
                .entry(subject_id)
                .or_default()
                .push(StoredQuestion {
                    question,
                    answer: answer.into(),
                    points,
                });
        }
        self
    }

    /// Record a finished attempt without going through a quiz.
    #[must_use]
    pub fn with_attempt(
        self,
        username: &str,
        subject_id: SubjectId,
        percentage: f64,
        completed_at: DateTime<Utc>,
    ) -> Self {
        if let Ok(mut state) = self.state() {
            state.attempts.push(AttemptRecord {
                username: username.to_string(),
                subject_id,
                percentage,
                completed_at,
            });
        }
        self
    }

    /// Make every call to `endpoint` fail until `recover` is called.
    pub fn fail(&self, endpoint: Endpoint) {
        if let Ok(mut state) = self.state() {
            state.failures.insert(endpoint);
        }
    }

    pub fn recover(&self, endpoint: Endpoint) {
        if let Ok(mut state) = self.state() {
            state.failures.remove(&endpoint);
        }
    }

    /// How many times `endpoint` has been called, failed calls included.
    #[must_use]
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.state()
            .map(|state| state.calls.get(&endpoint).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Seeded backend with a demo account (`demo` / `demo`) and three subjects.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Malformed` if a seeded question is invalid.
    pub fn demo() -> Result<Self, ApiError> {
        let rust = SubjectId::new(1);
        let geography = SubjectId::new(2);
        let science = SubjectId::new(3);
        let question = |id: u64, text: &str, kind: QuestionType, options: &[&str], level: &str| {
            Question::new(
                QuestionId::new(id),
                text,
                kind,
                options.iter().map(ToString::to_string).collect(),
                Difficulty::parse(level),
            )
            .map_err(|err| ApiError::Malformed(err.to_string()))
        };

        Ok(Self::new()
            .with_account("demo", "demo@example.com", "demo")
            .with_subject(
                Subject::new(rust, "Rust", "Ownership, traits and the borrow checker", "🦀")
                    .with_question_count(3),
            )
            .with_subject(
                Subject::new(geography, "Geography", "Capitals and countries", "🌍")
                    .with_question_count(2),
            )
            .with_subject(
                Subject::new(science, "Science", "Everyday physics and chemistry", "🔬")
                    .with_question_count(2),
            )
            .with_question(
                rust,
                question(
                    1,
                    "Which keyword makes a binding mutable?",
                    QuestionType::Single,
                    &["let", "mut", "ref", "static"],
                    "easy",
                )?,
                "mut",
                DEFAULT_POINTS,
            )
            .with_question(
                rust,
                question(
                    2,
                    "Which of these traits are auto traits?",
                    QuestionType::Multiple,
                    &["Send", "Clone", "Sync", "Debug"],
                    "medium",
                )?,
                "Send,Sync",
                15,
            )
            .with_question(
                rust,
                question(
                    3,
                    "Which macro prints a line to standard output?",
                    QuestionType::Fill,
                    &[],
                    "easy",
                )?,
                "println!",
                DEFAULT_POINTS,
            )
            .with_question(
                geography,
                question(
                    4,
                    "What is the capital of France?",
                    QuestionType::Single,
                    &["London", "Paris", "Rome", "Berlin"],
                    "easy",
                )?,
                "Paris",
                DEFAULT_POINTS,
            )
            .with_question(
                geography,
                question(
                    5,
                    "Which of these cities are capitals?",
                    QuestionType::Multiple,
                    &["Paris", "Sydney", "Berlin", "Zurich"],
                    "hard",
                )?,
                "Paris,Berlin",
                20,
            )
            .with_question(
                science,
                question(
                    6,
                    "What is the chemical symbol for water?",
                    QuestionType::Fill,
                    &[],
                    "easy",
                )?,
                "H2O",
                DEFAULT_POINTS,
            )
            .with_question(
                science,
                question(
                    7,
                    "At sea level, water boils at how many degrees Celsius?",
                    QuestionType::Single,
                    &["90", "100", "110"],
                    "medium",
                )?,
                "100",
                DEFAULT_POINTS,
            ))
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, ApiError> {
        self.state
            .lock()
            .map_err(|err| ApiError::Backend(err.to_string()))
    }

    /// Count the call, apply injected failures and lock the state.
    fn enter(&self, endpoint: Endpoint) -> Result<MutexGuard<'_, State>, ApiError> {
        let mut state = self.state()?;
        *state.calls.entry(endpoint).or_default() += 1;
        if state.failures.contains(&endpoint) {
            return Err(ApiError::HttpStatus(StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(state)
    }
}

impl State {
    fn require_user(&self) -> Result<String, ApiError> {
        self.signed_in.clone().ok_or(ApiError::Unauthenticated)
    }

    fn find_question(&self, id: QuestionId) -> Option<&StoredQuestion> {
        self.questions
            .values()
            .flatten()
            .find(|stored| stored.question.id() == id)
    }

    fn max_points(&self, subject_id: SubjectId) -> u32 {
        self.questions
            .get(&subject_id)
            .map_or(0, |questions| questions.iter().map(|stored| stored.points).sum())
    }
}

fn normalized(answer: &str) -> HashSet<String> {
    answer
        .split(ANSWER_DELIMITER)
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect()
}

fn rejected(status: StatusCode, message: &str) -> ApiError {
    ApiError::Rejected {
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl QuizApi for InMemoryQuizApi {
    async fn check_session(&self) -> Result<Option<User>, ApiError> {
        let state = self.enter(Endpoint::CheckSession)?;
        Ok(state.signed_in.clone().map(User::new))
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let mut state = self.enter(Endpoint::Register)?;
        if state.accounts.contains_key(&registration.username) {
            return Err(rejected(StatusCode::BAD_REQUEST, "Username already exists"));
        }
        if state
            .accounts
            .values()
            .any(|account| account.email == registration.email)
        {
            return Err(rejected(StatusCode::BAD_REQUEST, "Email already exists"));
        }
        state.accounts.insert(
            registration.username.clone(),
            Account {
                email: registration.email.clone(),
                password: registration.password.clone(),
            },
        );
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let mut state = self.enter(Endpoint::Login)?;
        let valid = state
            .accounts
            .get(&credentials.username)
            .is_some_and(|account| account.password == credentials.password);
        if !valid {
            return Err(rejected(StatusCode::UNAUTHORIZED, "Invalid credentials"));
        }
        state.signed_in = Some(credentials.username.clone());
        Ok(User::new(credentials.username.clone()))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let mut state = self.enter(Endpoint::Logout)?;
        state.signed_in = None;
        Ok(())
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, ApiError> {
        let state = self.enter(Endpoint::ListSubjects)?;
        state.require_user()?;
        Ok(state.subjects.clone())
    }

    async fn list_questions(&self, subject_id: SubjectId) -> Result<Vec<Question>, ApiError> {
        let state = self.enter(Endpoint::ListQuestions)?;
        state.require_user()?;
        Ok(state
            .questions
            .get(&subject_id)
            .map(|questions| questions.iter().map(|stored| stored.question.clone()).collect())
            .unwrap_or_default())
    }

    async fn submit_answer(&self, answer: &PendingAnswer) -> Result<AnswerVerdict, ApiError> {
        let state = self.enter(Endpoint::SubmitAnswer)?;
        state.require_user()?;
        let stored = state
            .find_question(answer.question_id)
            .ok_or_else(|| rejected(StatusCode::NOT_FOUND, "Question not found"))?;
        let correct = normalized(&answer.answer) == normalized(&stored.answer);
        Ok(AnswerVerdict {
            correct,
            correct_answer: stored.answer.clone(),
            earned_points: if correct { stored.points } else { 0 },
        })
    }

    async fn finish_quiz(&self, submission: &QuizSubmission) -> Result<f64, ApiError> {
        let mut state = self.enter(Endpoint::FinishQuiz)?;
        let username = state.require_user()?;
        let max_points = state.max_points(submission.subject_id);
        let percentage = if max_points == 0 {
            0.0
        } else {
            f64::from(submission.score) / f64::from(max_points) * 100.0
        };
        state.attempts.push(AttemptRecord {
            username,
            subject_id: submission.subject_id,
            percentage,
            completed_at: self.clock.now(),
        });
        Ok(percentage)
    }

    async fn leaderboard(&self, subject_id: SubjectId) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let state = self.enter(Endpoint::Leaderboard)?;
        let mut entries: Vec<LeaderboardEntry> = state
            .attempts
            .iter()
            .filter(|record| record.subject_id == subject_id)
            .map(|record| LeaderboardEntry {
                username: record.username.clone(),
                percentage: record.percentage,
                completed_at: record.completed_at,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.percentage
                .total_cmp(&a.percentage)
                .then(a.completed_at.cmp(&b.completed_at))
        });
        entries.truncate(LEADERBOARD_LIMIT);
        Ok(entries)
    }

    async fn user_stats(&self) -> Result<Vec<SubjectStats>, ApiError> {
        let state = self.enter(Endpoint::UserStats)?;
        let username = state.require_user()?;
        let stats = state
            .subjects
            .iter()
            .filter_map(|subject| {
                let scores: Vec<f64> = state
                    .attempts
                    .iter()
                    .filter(|r| r.username == username && r.subject_id == subject.id)
                    .map(|r| r.percentage)
                    .collect();
                if scores.is_empty() {
                    return None;
                }
                let attempts = u32::try_from(scores.len()).unwrap_or(u32::MAX);
                Some(SubjectStats {
                    subject: subject.name.clone(),
                    icon: subject.icon.clone(),
                    attempts,
                    best_score: scores.iter().copied().fold(f64::MIN, f64::max),
                    avg_score: scores.iter().sum::<f64>() / f64::from(attempts),
                })
            })
            .collect();
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::{fixed_clock, fixed_now};

    fn api() -> InMemoryQuizApi {
        InMemoryQuizApi::demo().unwrap().with_clock(fixed_clock())
    }

    async fn login(api: &InMemoryQuizApi) {
        api.login(&Credentials::new("demo", "demo").unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn subjects_require_login() {
        let api = api();
        assert!(matches!(
            api.list_subjects().await,
            Err(ApiError::Unauthenticated)
        ));
        login(&api).await;
        assert_eq!(api.list_subjects().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn multiple_answer_ignores_order_and_case() {
        let api = api();
        login(&api).await;
        let verdict = api
            .submit_answer(&PendingAnswer {
                question_id: QuestionId::new(5),
                answer: "berlin, Paris".into(),
            })
            .await
            .unwrap();
        assert!(verdict.correct);
        assert_eq!(verdict.earned_points, 20);
    }

    #[tokio::test]
    async fn finish_quiz_ranks_attempts() {
        let api = api().with_attempt("alice", SubjectId::new(2), 50.0, fixed_now());
        login(&api).await;
        let percentage = api
            .finish_quiz(&QuizSubmission {
                subject_id: SubjectId::new(2),
                score: 30,
                total_questions: 2,
            })
            .await
            .unwrap();
        assert!((percentage - 100.0).abs() < f64::EPSILON);

        let board = api.leaderboard(SubjectId::new(2)).await.unwrap();
        assert_eq!(board[0].username, "demo");
        assert_eq!(board[1].username, "alice");

        let stats = api.user_stats().await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].attempts, 1);
    }

    #[tokio::test]
    async fn injected_failure_is_counted() {
        let api = api();
        api.fail(Endpoint::Leaderboard);
        assert!(api.leaderboard(SubjectId::new(1)).await.is_err());
        api.recover(Endpoint::Leaderboard);
        assert!(api.leaderboard(SubjectId::new(1)).await.unwrap().is_empty());
        assert_eq!(api.calls(Endpoint::Leaderboard), 2);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_with_message() {
        let api = api();
        let err = api
            .register(&Registration::new("demo", "other@example.com", "pw").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Username already exists"));
    }
}
