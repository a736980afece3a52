use std::cell::RefCell;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use quiz_core::model::SubjectId;

use super::service::QuizSession;
use crate::api::QuizApi;
use crate::error::SessionError;

/// Shared home of a [`QuizSession`] that can be borrowed for one transition
/// at a time.
///
/// No borrow is held across an `.await`: the loop service borrows once to
/// begin a request and once more to complete it.
pub trait SessionCell {
    fn update<R>(&self, f: impl FnOnce(&mut QuizSession) -> R) -> R;
}

impl SessionCell for RefCell<QuizSession> {
    fn update<R>(&self, f: impl FnOnce(&mut QuizSession) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

impl SessionCell for Mutex<QuizSession> {
    fn update<R>(&self, f: impl FnOnce(&mut QuizSession) -> R) -> R {
        let mut guard = self.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

/// Runs each network-backed action of a session against the backend.
#[derive(Clone)]
pub struct QuizLoopService {
    api: Arc<dyn QuizApi>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    /// Restore a server session at startup and load subjects if signed in.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the check or the subject load fails.
    pub async fn check_session<S: SessionCell>(&self, cell: &S) -> Result<(), SessionError> {
        let ticket = cell.update(QuizSession::begin_check_session)?;
        let result = self.api.check_session().await;
        cell.update(|session| session.complete_check_session(ticket, result))?;
        if cell.update(|session| session.user().is_some()) {
            self.load_subjects(cell).await?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError` for invalid fields or a refused registration.
    pub async fn register<S: SessionCell>(
        &self,
        cell: &S,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        let (ticket, registration) =
            cell.update(|session| session.begin_register(username, email, password))?;
        let result = self.api.register(&registration).await;
        cell.update(|session| session.complete_register(ticket, result))
    }

    /// Log in, then refresh the subject grid.
    ///
    /// A failed subject refresh is reported by its own notification and
    /// does not undo the login.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for invalid fields or refused credentials.
    pub async fn login<S: SessionCell>(
        &self,
        cell: &S,
        username: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        let (ticket, credentials) = cell.update(|session| session.begin_login(username, password))?;
        let result = self.api.login(&credentials).await;
        cell.update(|session| session.complete_login(ticket, result))?;
        if let Err(err) = self.load_subjects(cell).await {
            warn!(error = %err, "subjects not loaded after login");
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError` when logout is not possible or failed.
    pub async fn logout<S: SessionCell>(&self, cell: &S) -> Result<(), SessionError> {
        let ticket = cell.update(QuizSession::begin_logout)?;
        let result = self.api.logout().await;
        cell.update(|session| session.complete_logout(ticket, result))
    }

    /// # Errors
    ///
    /// Returns `SessionError` when the list could not be loaded.
    pub async fn load_subjects<S: SessionCell>(&self, cell: &S) -> Result<(), SessionError> {
        let ticket = cell.update(QuizSession::begin_load_subjects)?;
        let result = self.api.list_subjects().await;
        cell.update(|session| session.complete_load_subjects(ticket, result))
    }

    /// # Errors
    ///
    /// Returns `SessionError` when the quiz cannot start.
    pub async fn start_quiz<S: SessionCell>(
        &self,
        cell: &S,
        subject_id: SubjectId,
    ) -> Result<(), SessionError> {
        let ticket = cell.update(|session| session.begin_start_quiz(subject_id))?;
        let result = self.api.list_questions(subject_id).await;
        cell.update(|session| session.complete_start_quiz(ticket, result))
    }

    /// # Errors
    ///
    /// Returns `SessionError` for an invalid draft or a failed submission.
    pub async fn submit_answer<S: SessionCell>(&self, cell: &S) -> Result<(), SessionError> {
        let (ticket, answer) = cell.update(QuizSession::begin_submit_answer)?;
        let result = self.api.submit_answer(&answer).await;
        cell.update(|session| session.complete_submit_answer(ticket, result))
    }

    /// # Errors
    ///
    /// Returns `SessionError` while questions remain or when saving failed.
    pub async fn finish_quiz<S: SessionCell>(&self, cell: &S) -> Result<(), SessionError> {
        let (ticket, submission) = cell.update(QuizSession::begin_finish_quiz)?;
        let result = self.api.finish_quiz(&submission).await;
        cell.update(|session| session.complete_finish_quiz(ticket, result))
    }

    /// # Errors
    ///
    /// Returns `SessionError` without a current subject or when loading failed.
    pub async fn show_leaderboard<S: SessionCell>(
        &self,
        cell: &S,
    ) -> Result<(), SessionError> {
        let ticket = cell.update(QuizSession::begin_leaderboard)?;
        let subject_id = ticket.subject().ok_or(SessionError::NoSubjectSelected)?;
        let result = self.api.leaderboard(subject_id).await;
        cell.update(|session| session.complete_leaderboard(ticket, result))
    }

    /// # Errors
    ///
    /// Returns `SessionError` when the statistics could not be loaded.
    pub async fn show_stats<S: SessionCell>(&self, cell: &S) -> Result<(), SessionError> {
        let ticket = cell.update(QuizSession::begin_stats)?;
        let result = self.api.user_stats().await;
        cell.update(|session| session.complete_stats(ticket, result))
    }

    /// Return to the subject grid and refresh it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when navigation is not allowed or the refresh
    /// failed.
    pub async fn back_to_subjects<S: SessionCell>(
        &self,
        cell: &S,
    ) -> Result<(), SessionError> {
        cell.update(QuizSession::back_to_subjects)?;
        self.load_subjects(cell).await
    }
}
