use tracing::{debug, info, warn};

use quiz_core::Clock;
use quiz_core::model::{
    AnswerVerdict, AttemptError, Credentials, LeaderboardEntry, Notification, NotificationId,
    NotificationKind, PendingAnswer, Question, QuizAttempt, QuizResults, QuizSubmission,
    Registration, Subject, SubjectId, SubjectStats, User,
};

use super::state::{AuthMode, LeaderboardPanel, Operation, Screen, Ticket};
use crate::error::{ApiError, SessionError};

//
// ─── MESSAGES ──────────────────────────────────────────────────────────────────
//

const MSG_REGISTERED: &str = "Registration successful! Please login.";
const MSG_REGISTER_FAILED: &str = "Registration failed";
const MSG_LOGGED_IN: &str = "Login successful!";
const MSG_LOGIN_FAILED: &str = "Login failed";
const MSG_LOGGED_OUT: &str = "Logged out successfully";
const MSG_LOGOUT_FAILED: &str = "Logout failed";
const MSG_LOGIN_REQUIRED: &str = "Please login to view subjects";
const MSG_SUBJECTS_FAILED: &str = "Failed to load subjects";
const MSG_NO_QUESTIONS: &str = "No questions available for this subject";
const MSG_QUESTIONS_FAILED: &str = "Failed to load questions";
const MSG_SUBMIT_FAILED: &str = "Failed to submit answer";
const MSG_FINISH_FAILED: &str = "Failed to save quiz results";
const MSG_NO_SUBJECT: &str = "Please complete a quiz first";
const MSG_LEADERBOARD_FAILED: &str = "Failed to load leaderboard";
const MSG_STATS_FAILED: &str = "Failed to load statistics";

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// The whole client-side state of the quiz app.
///
/// Every user action is a synchronous transition. Actions that need the
/// backend are split in two: `begin_*` validates, marks the request as pending
/// and returns a [`Ticket`]; `complete_*` takes that ticket back with the
/// backend's result. Only one request may be pending at a time, and local
/// navigation invalidates outstanding tickets so late responses change
/// nothing.
#[derive(Debug, Clone)]
pub struct QuizSession {
    clock: Clock,
    user: Option<User>,
    screen: Screen,
    subjects: Vec<Subject>,
    current_subject: Option<Subject>,
    attempt: Option<QuizAttempt>,
    results: Option<QuizResults>,
    stats: Vec<SubjectStats>,
    leaderboard: Option<LeaderboardPanel>,
    auth_form: Option<AuthMode>,
    notification: Option<Notification>,
    next_notification_id: u64,
    pending: Option<Ticket>,
    generation: u64,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new(Clock::default())
    }
}

impl QuizSession {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            user: None,
            screen: Screen::LoggedOut,
            subjects: Vec::new(),
            current_subject: None,
            attempt: None,
            results: None,
            stats: Vec::new(),
            leaderboard: None,
            auth_form: None,
            notification: None,
            next_notification_id: 1,
            pending: None,
            generation: 0,
        }
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Subject of the running or last finished quiz.
    #[must_use]
    pub fn current_subject(&self) -> Option<&Subject> {
        self.current_subject.as_ref()
    }

    #[must_use]
    pub fn attempt(&self) -> Option<&QuizAttempt> {
        self.attempt.as_ref()
    }

    #[must_use]
    pub fn results(&self) -> Option<&QuizResults> {
        self.results.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> &[SubjectStats] {
        &self.stats
    }

    #[must_use]
    pub fn leaderboard(&self) -> Option<&LeaderboardPanel> {
        self.leaderboard.as_ref()
    }

    #[must_use]
    pub fn auth_form(&self) -> Option<AuthMode> {
        self.auth_form
    }

    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    #[must_use]
    pub fn pending_operation(&self) -> Option<Operation> {
        self.pending.map(|ticket| ticket.op)
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    //
    // ─── NOTIFICATIONS ─────────────────────────────────────────────────────────
    //

    /// Show `message`, replacing any notification on screen.
    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) -> NotificationId {
        let id = NotificationId::new(self.next_notification_id);
        self.next_notification_id += 1;
        self.notification = Some(Notification::new(id, kind, message, self.clock.now()));
        id
    }

    /// Clear notification `id` if it is still the one on screen.
    pub fn dismiss_notification(&mut self, id: NotificationId) {
        if self.notification.as_ref().is_some_and(|n| n.id == id) {
            self.notification = None;
        }
    }

    fn fail(&mut self, message: &str, err: impl Into<SessionError>) -> SessionError {
        self.notify(NotificationKind::Error, message);
        err.into()
    }

    //
    // ─── REQUEST BOOKKEEPING ───────────────────────────────────────────────────
    //

    fn begin(&mut self, op: Operation, subject: Option<SubjectId>) -> Result<Ticket, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::Busy);
        }
        let ticket = Ticket {
            op,
            generation: self.generation,
            subject,
        };
        self.pending = Some(ticket);
        debug!(?op, generation = self.generation, "request started");
        Ok(ticket)
    }

    fn finish(&mut self, ticket: Ticket) -> Result<(), SessionError> {
        if self.pending != Some(ticket) {
            debug!(op = ?ticket.op, generation = ticket.generation, "dropping stale response");
            return Err(SessionError::Stale);
        }
        self.pending = None;
        Ok(())
    }

    /// Local navigation must not orphan a pending logout.
    fn refuse_during_logout(&self) -> Result<(), SessionError> {
        match self.pending {
            Some(ticket) if ticket.op == Operation::Logout => Err(SessionError::Busy),
            _ => Ok(()),
        }
    }

    /// Drop whatever request is pending; its response will be discarded.
    fn invalidate(&mut self) {
        self.generation += 1;
        if let Some(ticket) = self.pending.take() {
            debug!(op = ?ticket.op, "pending request invalidated");
        }
        if let Some(attempt) = self.attempt.as_mut() {
            attempt.abort_submission();
        }
    }

    fn require_screen(&self, op: Operation, allowed: &[Screen]) -> Result<(), SessionError> {
        if allowed.contains(&self.screen) {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                op,
                screen: self.screen,
            })
        }
    }

    fn require_user(&self, op: Operation) -> Result<(), SessionError> {
        if self.user.is_some() {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                op,
                screen: self.screen,
            })
        }
    }

    fn require_logged_out(&self, op: Operation) -> Result<(), SessionError> {
        if self.user.is_none() {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                op,
                screen: self.screen,
            })
        }
    }

    fn reset(&mut self) {
        let generation = self.generation + 1;
        let next_notification_id = self.next_notification_id;
        *self = Self {
            generation,
            next_notification_id,
            ..Self::new(self.clock)
        };
    }

    //
    // ─── AUTH ──────────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `SessionError::Busy` while another request is pending.
    pub fn begin_check_session(&mut self) -> Result<Ticket, SessionError> {
        self.begin(Operation::CheckSession, None)
    }

    /// A failed check is logged and leaves the user logged out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Stale` for an outdated ticket and
    /// `SessionError::Api` when the check failed.
    pub fn complete_check_session(
        &mut self,
        ticket: Ticket,
        result: Result<Option<User>, ApiError>,
    ) -> Result<(), SessionError> {
        self.finish(ticket)?;
        match result {
            Ok(Some(user)) => {
                info!(username = %user.username, "session restored");
                self.user = Some(user);
                self.screen = Screen::Home;
                Ok(())
            }
            Ok(None) => {
                self.screen = Screen::LoggedOut;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "session check failed");
                self.screen = Screen::LoggedOut;
                Err(err.into())
            }
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::Credentials` (with a notification) for blank
    /// fields, `SessionError::InvalidState` when already logged in and
    /// `SessionError::Busy` while another request is pending.
    pub fn begin_register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(Ticket, Registration), SessionError> {
        self.require_logged_out(Operation::Register)?;
        let registration = Registration::new(username, email, password)
            .map_err(|err| self.fail(err.message(), err))?;
        let ticket = self.begin(Operation::Register, None)?;
        Ok((ticket, registration))
    }

    /// # Errors
    ///
    /// Returns `SessionError::Stale` for an outdated ticket and
    /// `SessionError::Api` when registration was refused.
    pub fn complete_register(
        &mut self,
        ticket: Ticket,
        result: Result<(), ApiError>,
    ) -> Result<(), SessionError> {
        self.finish(ticket)?;
        match result {
            Ok(()) => {
                self.notify(NotificationKind::Success, MSG_REGISTERED);
                self.auth_form = Some(AuthMode::Login);
                Ok(())
            }
            Err(err) => {
                let message = err.server_message().unwrap_or(MSG_REGISTER_FAILED).to_string();
                Err(self.fail(&message, err))
            }
        }
    }

    /// # Errors
    ///
    /// Same as [`QuizSession::begin_register`].
    pub fn begin_login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<(Ticket, Credentials), SessionError> {
        self.require_logged_out(Operation::Login)?;
        let credentials =
            Credentials::new(username, password).map_err(|err| self.fail(err.message(), err))?;
        let ticket = self.begin(Operation::Login, None)?;
        Ok((ticket, credentials))
    }

    /// # Errors
    ///
    /// Returns `SessionError::Stale` for an outdated ticket and
    /// `SessionError::Api` when login was refused.
    pub fn complete_login(
        &mut self,
        ticket: Ticket,
        result: Result<User, ApiError>,
    ) -> Result<(), SessionError> {
        self.finish(ticket)?;
        match result {
            Ok(user) => {
                info!(username = %user.username, "logged in");
                self.user = Some(user);
                self.screen = Screen::Home;
                self.auth_form = None;
                self.notify(NotificationKind::Success, MSG_LOGGED_IN);
                Ok(())
            }
            Err(err) => {
                let message = err.server_message().unwrap_or(MSG_LOGIN_FAILED).to_string();
                Err(self.fail(&message, err))
            }
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` when nobody is logged in and
    /// `SessionError::Busy` while another request is pending.
    pub fn begin_logout(&mut self) -> Result<Ticket, SessionError> {
        self.require_user(Operation::Logout)?;
        self.begin(Operation::Logout, None)
    }

    /// On success every trace of the previous user is dropped.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Stale` for an outdated ticket and
    /// `SessionError::Api` when the call failed.
    pub fn complete_logout(
        &mut self,
        ticket: Ticket,
        result: Result<(), ApiError>,
    ) -> Result<(), SessionError> {
        self.finish(ticket)?;
        match result {
            Ok(()) => {
                info!("logged out");
                self.reset();
                self.notify(NotificationKind::Success, MSG_LOGGED_OUT);
                Ok(())
            }
            Err(err) => Err(self.fail(MSG_LOGOUT_FAILED, err)),
        }
    }

    pub fn show_auth(&mut self, mode: AuthMode) {
        if self.user.is_none() {
            self.auth_form = Some(mode);
        }
    }

    pub fn close_auth(&mut self) {
        self.auth_form = None;
    }

    //
    // ─── SUBJECTS ──────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` when nobody is logged in and
    /// `SessionError::Busy` while another request is pending.
    pub fn begin_load_subjects(&mut self) -> Result<Ticket, SessionError> {
        self.require_user(Operation::LoadSubjects)?;
        self.begin(Operation::LoadSubjects, None)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Stale` for an outdated ticket and
    /// `SessionError::Api` when the list could not be loaded.
    pub fn complete_load_subjects(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Subject>, ApiError>,
    ) -> Result<(), SessionError> {
        self.finish(ticket)?;
        match result {
            Ok(subjects) => {
                debug!(count = subjects.len(), "subjects loaded");
                self.subjects = subjects;
                Ok(())
            }
            Err(ApiError::Unauthenticated) => {
                self.auth_form = Some(AuthMode::Login);
                Err(self.fail(MSG_LOGIN_REQUIRED, ApiError::Unauthenticated))
            }
            Err(err) => Err(self.fail(MSG_SUBJECTS_FAILED, err)),
        }
    }

    //
    // ─── QUIZ ──────────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` off the home screen,
    /// `SessionError::UnknownSubject` for a subject not in the list and
    /// `SessionError::Busy` while another request is pending.
    pub fn begin_start_quiz(&mut self, subject_id: SubjectId) -> Result<Ticket, SessionError> {
        self.require_screen(Operation::StartQuiz, &[Screen::Home])?;
        if !self.subjects.iter().any(|s| s.id == subject_id) {
            return Err(SessionError::UnknownSubject(subject_id));
        }
        self.begin(Operation::StartQuiz, Some(subject_id))
    }

    /// # Errors
    ///
    /// Returns `SessionError::Stale` for an outdated ticket,
    /// `SessionError::NoQuestions` for an empty question list and
    /// `SessionError::Api` when the questions could not be loaded.
    pub fn complete_start_quiz(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Question>, ApiError>,
    ) -> Result<(), SessionError> {
        self.finish(ticket)?;
        let questions = result.map_err(|err| self.fail(MSG_QUESTIONS_FAILED, err))?;
        if questions.is_empty() {
            return Err(self.fail(MSG_NO_QUESTIONS, SessionError::NoQuestions));
        }
        let subject_id = ticket.subject.ok_or(SessionError::NoSubjectSelected)?;
        let subject = self
            .subjects
            .iter()
            .find(|s| s.id == subject_id)
            .cloned()
            .ok_or(SessionError::UnknownSubject(subject_id))?;

        let attempt = QuizAttempt::new(subject.clone(), questions)?;
        info!(subject = %subject.name, questions = attempt.total_questions(), "quiz started");
        self.current_subject = Some(subject);
        self.attempt = Some(attempt);
        self.results = None;
        self.leaderboard = None;
        self.screen = Screen::Quiz;
        Ok(())
    }

    fn attempt_mut(&mut self) -> Result<&mut QuizAttempt, SessionError> {
        self.attempt.as_mut().ok_or(SessionError::NoActiveAttempt)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoActiveAttempt` outside a quiz and
    /// `SessionError::Attempt` when the question can no longer be edited.
    pub fn select_option(&mut self, option: usize) -> Result<(), SessionError> {
        self.attempt_mut()?.select_option(option)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Same as [`QuizSession::select_option`].
    pub fn set_fill_text(&mut self, text: &str) -> Result<(), SessionError> {
        self.attempt_mut()?.set_fill_text(text)?;
        Ok(())
    }

    /// Validate the draft and lock the submit control.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` while another request is pending and
    /// `SessionError::Attempt` (with a notification for validation failures)
    /// when the draft cannot be submitted. Nothing changes on error.
    pub fn begin_submit_answer(&mut self) -> Result<(Ticket, PendingAnswer), SessionError> {
        self.require_screen(Operation::SubmitAnswer, &[Screen::Quiz])?;
        if self.pending.is_some() {
            return Err(SessionError::Busy);
        }
        let attempt = self.attempt_mut()?;
        let subject_id = attempt.subject().id;
        let answer = match attempt.begin_submission() {
            Ok(answer) => answer,
            Err(AttemptError::Answer(err)) => {
                return Err(self.fail(err.message(), AttemptError::Answer(err)));
            }
            Err(err) => return Err(err.into()),
        };
        let ticket = self.begin(Operation::SubmitAnswer, Some(subject_id))?;
        Ok((ticket, answer))
    }

    /// # Errors
    ///
    /// Returns `SessionError::Stale` for an outdated ticket and
    /// `SessionError::Api` when the call failed; the submit control is then
    /// usable again.
    pub fn complete_submit_answer(
        &mut self,
        ticket: Ticket,
        result: Result<AnswerVerdict, ApiError>,
    ) -> Result<(), SessionError> {
        self.finish(ticket)?;
        let attempt = self.attempt_mut()?;
        match result {
            Ok(verdict) => {
                debug!(
                    correct = verdict.correct,
                    points = verdict.earned_points,
                    "answer graded"
                );
                attempt.record_verdict(verdict)?;
                Ok(())
            }
            Err(err) => {
                attempt.abort_submission();
                Err(self.fail(MSG_SUBMIT_FAILED, err))
            }
        }
    }

    /// Leave the feedback of the last answer for the next question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Attempt` with `AttemptError::Complete` after the
    /// last question; the quiz must be finished instead.
    pub fn next_question(&mut self) -> Result<(), SessionError> {
        self.attempt_mut()?.advance()?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::Attempt` while questions remain and
    /// `SessionError::Busy` while another request is pending.
    pub fn begin_finish_quiz(&mut self) -> Result<(Ticket, QuizSubmission), SessionError> {
        self.require_screen(Operation::FinishQuiz, &[Screen::Quiz])?;
        let submission = self
            .attempt
            .as_ref()
            .ok_or(SessionError::NoActiveAttempt)?
            .submission()?;
        let ticket = self.begin(Operation::FinishQuiz, Some(submission.subject_id))?;
        Ok((ticket, submission))
    }

    /// # Errors
    ///
    /// Returns `SessionError::Stale` for an outdated ticket and
    /// `SessionError::Api` when the results could not be saved; the attempt
    /// is kept so finishing can be retried.
    pub fn complete_finish_quiz(
        &mut self,
        ticket: Ticket,
        result: Result<f64, ApiError>,
    ) -> Result<(), SessionError> {
        self.finish(ticket)?;
        let percentage = result.map_err(|err| self.fail(MSG_FINISH_FAILED, err))?;
        let attempt = self.attempt.as_ref().ok_or(SessionError::NoActiveAttempt)?;
        let results = attempt.results(percentage)?;
        info!(
            subject = %results.subject.name,
            score = results.score,
            percentage,
            "quiz finished"
        );
        self.results = Some(results);
        self.attempt = None;
        self.screen = Screen::Results;
        Ok(())
    }

    /// Drop the running quiz and return to the subject grid.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside a quiz and
    /// `SessionError::Busy` while a logout is pending.
    pub fn abandon_quiz(&mut self) -> Result<(), SessionError> {
        self.require_screen(Operation::SubmitAnswer, &[Screen::Quiz])?;
        self.refuse_during_logout()?;
        self.invalidate();
        self.attempt = None;
        self.screen = Screen::Home;
        info!("quiz abandoned");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` when logged out or inside a quiz
    /// and `SessionError::Busy` while a logout is pending.
    pub fn back_to_subjects(&mut self) -> Result<(), SessionError> {
        self.require_screen(
            Operation::LoadSubjects,
            &[Screen::Home, Screen::Results, Screen::Stats],
        )?;
        self.refuse_during_logout()?;
        self.invalidate();
        self.results = None;
        self.leaderboard = None;
        self.screen = Screen::Home;
        Ok(())
    }

    //
    // ─── LEADERBOARD & STATS ───────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `SessionError::NoSubjectSelected` (with a notification) before
    /// any quiz was started and `SessionError::Busy` while another request is
    /// pending.
    pub fn begin_leaderboard(&mut self) -> Result<Ticket, SessionError> {
        let Some(subject_id) = self.current_subject.as_ref().map(|s| s.id) else {
            return Err(self.fail(MSG_NO_SUBJECT, SessionError::NoSubjectSelected));
        };
        self.begin(Operation::Leaderboard, Some(subject_id))
    }

    /// # Errors
    ///
    /// Returns `SessionError::Stale` for an outdated ticket and
    /// `SessionError::Api` when the leaderboard could not be loaded.
    pub fn complete_leaderboard(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<LeaderboardEntry>, ApiError>,
    ) -> Result<(), SessionError> {
        self.finish(ticket)?;
        let entries = result.map_err(|err| self.fail(MSG_LEADERBOARD_FAILED, err))?;
        let subject = ticket.subject.ok_or(SessionError::NoSubjectSelected)?;
        let subject_name = self
            .current_subject
            .iter()
            .chain(self.subjects.iter())
            .find(|s| s.id == subject)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        self.leaderboard = Some(LeaderboardPanel {
            subject,
            subject_name,
            entries,
        });
        Ok(())
    }

    pub fn close_leaderboard(&mut self) {
        self.leaderboard = None;
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` when logged out or inside a quiz
    /// and `SessionError::Busy` while another request is pending.
    pub fn begin_stats(&mut self) -> Result<Ticket, SessionError> {
        self.require_user(Operation::Stats)?;
        self.require_screen(
            Operation::Stats,
            &[Screen::Home, Screen::Results, Screen::Stats],
        )?;
        self.begin(Operation::Stats, None)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Stale` for an outdated ticket and
    /// `SessionError::Api` when the statistics could not be loaded.
    pub fn complete_stats(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<SubjectStats>, ApiError>,
    ) -> Result<(), SessionError> {
        self.finish(ticket)?;
        let stats = result.map_err(|err| self.fail(MSG_STATS_FAILED, err))?;
        self.stats = stats;
        self.leaderboard = None;
        self.screen = Screen::Stats;
        Ok(())
    }
}
