use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use quiz_core::model::{
    AnswerVerdict, Credentials, LeaderboardEntry, PendingAnswer, Question, QuizSubmission,
    Registration, Subject, SubjectId, SubjectStats, User,
};

use super::wire::{
    CheckSessionBody, ErrorBody, FinishQuizBody, FinishQuizRequest, LeaderboardBody, LoginBody,
    LoginRequest, QuestionBody, RegisterRequest, StatsBody, SubjectBody, SubmitAnswerRequest,
    VerdictBody, decode,
};
use super::{Endpoint, QuizApi};
use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read `QUIZ_API_URL` and `QUIZ_HTTP_TIMEOUT_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("QUIZ_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout = env::var("QUIZ_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);
        Self { base_url, timeout }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `QuizApi` over HTTP. The server session lives in the client's cookie jar.
#[derive(Clone, Debug)]
pub struct HttpQuizApi {
    client: Client,
    base_url: Url,
}

impl HttpQuizApi {
    /// # Errors
    ///
    /// Returns `ApiError::InvalidBaseUrl` for an unusable base url and
    /// `ApiError::Http` if the client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut raw = config.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).map_err(|err| ApiError::InvalidBaseUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.clone()));
        }
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::InvalidBaseUrl(err.to_string()))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.request(method, self.url(path)?))
    }

    async fn send(&self, endpoint: Endpoint, request: RequestBuilder) -> Result<Response, ApiError> {
        debug!(?endpoint, "sending request");
        let response = request.send().await.inspect_err(|err| {
            warn!(?endpoint, error = %err, "request failed");
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        warn!(?endpoint, %status, "request rejected");
        // Login and register answer 401 with the reason in the body.
        let exchanges_credentials = matches!(endpoint, Endpoint::Login | Endpoint::Register);
        if endpoint == Endpoint::ListSubjects
            || (status == reqwest::StatusCode::UNAUTHORIZED && !exchanges_credentials)
        {
            return Err(ApiError::Unauthenticated);
        }
        let bytes = response.bytes().await?;
        match serde_json::from_slice::<ErrorBody>(&bytes) {
            Ok(body) => Err(ApiError::Rejected {
                status,
                message: body.error,
            }),
            Err(_) => Err(ApiError::HttpStatus(status)),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(endpoint, self.request(Method::GET, path)?).await?;
        decode(&response.bytes().await?)
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::POST, path)?.json(body);
        let response = self.send(endpoint, request).await?;
        decode(&response.bytes().await?)
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn check_session(&self) -> Result<Option<User>, ApiError> {
        let body: CheckSessionBody = self
            .get_json(Endpoint::CheckSession, "api/check-auth")
            .await?;
        body.into_user()
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let request = self
            .request(Method::POST, "api/register")?
            .json(&RegisterRequest {
                username: &registration.username,
                email: &registration.email,
                password: &registration.password,
            });
        self.send(Endpoint::Register, request).await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let body: LoginBody = self
            .post_json(
                Endpoint::Login,
                "api/login",
                &LoginRequest {
                    username: &credentials.username,
                    password: &credentials.password,
                },
            )
            .await?;
        Ok(body.user.into())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let request = self.request(Method::POST, "api/logout")?;
        self.send(Endpoint::Logout, request).await?;
        Ok(())
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, ApiError> {
        let body: Vec<SubjectBody> = self.get_json(Endpoint::ListSubjects, "api/subjects").await?;
        Ok(body.into_iter().map(Subject::from).collect())
    }

    async fn list_questions(&self, subject_id: SubjectId) -> Result<Vec<Question>, ApiError> {
        let path = format!("api/questions/{subject_id}");
        let body: Vec<QuestionBody> = self.get_json(Endpoint::ListQuestions, &path).await?;
        body.into_iter().map(Question::try_from).collect()
    }

    async fn submit_answer(&self, answer: &PendingAnswer) -> Result<AnswerVerdict, ApiError> {
        let body: VerdictBody = self
            .post_json(
                Endpoint::SubmitAnswer,
                "api/submit-answer",
                &SubmitAnswerRequest {
                    question_id: answer.question_id.value(),
                    answer: &answer.answer,
                },
            )
            .await?;
        Ok(body.into())
    }

    async fn finish_quiz(&self, submission: &QuizSubmission) -> Result<f64, ApiError> {
        let body: FinishQuizBody = self
            .post_json(
                Endpoint::FinishQuiz,
                "api/submit-quiz",
                &FinishQuizRequest {
                    subject_id: submission.subject_id.value(),
                    score: submission.score,
                    total_questions: submission.total_questions,
                },
            )
            .await?;
        if !body.percentage.is_finite() {
            return Err(ApiError::Malformed("percentage is not a number".into()));
        }
        Ok(body.percentage)
    }

    async fn leaderboard(&self, subject_id: SubjectId) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let path = format!("api/leaderboard/{subject_id}");
        let body: Vec<LeaderboardBody> = self.get_json(Endpoint::Leaderboard, &path).await?;
        body.into_iter().map(LeaderboardEntry::try_from).collect()
    }

    async fn user_stats(&self) -> Result<Vec<SubjectStats>, ApiError> {
        let body: Vec<StatsBody> = self.get_json(Endpoint::UserStats, "api/user-stats").await?;
        Ok(body.into_iter().map(SubjectStats::from).collect())
    }
}
