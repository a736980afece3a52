//! JSON shapes exchanged with the quiz backend and their conversion into
//! domain types.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    AnswerVerdict, Difficulty, LeaderboardEntry, Question, QuestionId, QuestionType, Subject,
    SubjectId, SubjectStats, User,
};

use crate::error::ApiError;

//
// ─── REQUESTS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub(super) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct SubmitAnswerRequest<'a> {
    pub question_id: u64,
    pub answer: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct FinishQuizRequest {
    pub subject_id: u64,
    pub score: u32,
    pub total_questions: usize,
}

//
// ─── RESPONSES ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserBody {
    pub username: String,
}

impl From<UserBody> for User {
    fn from(body: UserBody) -> Self {
        User::new(body.username)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CheckSessionBody {
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<UserBody>,
}

impl CheckSessionBody {
    pub(super) fn into_user(self) -> Result<Option<User>, ApiError> {
        match (self.authenticated, self.user) {
            (true, Some(user)) => Ok(Some(user.into())),
            (true, None) => Err(ApiError::Malformed(
                "authenticated session without user".into(),
            )),
            (false, _) => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginBody {
    pub user: UserBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct SubjectBody {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub question_count: Option<u32>,
}

impl From<SubjectBody> for Subject {
    fn from(body: SubjectBody) -> Self {
        let subject = Subject::new(SubjectId::new(body.id), body.name, body.description, body.icon);
        match body.question_count {
            Some(count) => subject.with_question_count(count),
            None => subject,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct QuestionBody {
    pub id: u64,
    pub question_text: String,
    pub question_type: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub difficulty: String,
}

impl TryFrom<QuestionBody> for Question {
    type Error = ApiError;

    fn try_from(body: QuestionBody) -> Result<Self, Self::Error> {
        let kind: QuestionType = body
            .question_type
            .parse()
            .map_err(|err| ApiError::Malformed(format!("question {}: {err}", body.id)))?;
        Question::new(
            QuestionId::new(body.id),
            body.question_text,
            kind,
            body.options.unwrap_or_default(),
            Difficulty::parse(&body.difficulty),
        )
        .map_err(|err| ApiError::Malformed(err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct VerdictBody {
    pub correct: bool,
    pub correct_answer: String,
    pub earned_points: u32,
}

impl From<VerdictBody> for AnswerVerdict {
    fn from(body: VerdictBody) -> Self {
        AnswerVerdict {
            correct: body.correct,
            correct_answer: body.correct_answer,
            earned_points: body.earned_points,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct FinishQuizBody {
    pub percentage: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct LeaderboardBody {
    pub username: String,
    pub percentage: f64,
    pub completed_at: String,
}

impl TryFrom<LeaderboardBody> for LeaderboardEntry {
    type Error = ApiError;

    fn try_from(body: LeaderboardBody) -> Result<Self, Self::Error> {
        Ok(LeaderboardEntry {
            completed_at: parse_timestamp(&body.completed_at)?,
            username: body.username,
            percentage: body.percentage,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct StatsBody {
    pub subject: String,
    #[serde(default)]
    pub icon: String,
    pub attempts: u32,
    pub best_score: f64,
    pub avg_score: f64,
}

impl From<StatsBody> for SubjectStats {
    fn from(body: StatsBody) -> Self {
        SubjectStats {
            subject: body.subject,
            icon: body.icon,
            attempts: body.attempts,
            best_score: body.best_score,
            avg_score: body.avg_score,
        }
    }
}

/// Accepts RFC 3339, or a naive ISO-8601 date-time taken as UTC.
pub(super) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ApiError::Malformed(format!("invalid timestamp: {raw}")))
}

pub(super) fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|err| ApiError::Malformed(err.to_string()))
}
