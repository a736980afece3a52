use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use quiz_core::model::{NOTIFICATION_TTL_SECS, NotificationId, SubjectId};
use services::{AuthMode, QuizLoopService, QuizSession, SessionCell, SessionError};
use tracing::debug;

use crate::context::{AppContext, SessionSignal};

#[derive(Clone, Debug, PartialEq)]
pub enum QuizIntent {
    CheckSession,
    ShowAuth(AuthMode),
    CloseAuth,
    Login {
        username: String,
        password: String,
    },
    Register {
        username: String,
        email: String,
        password: String,
    },
    Logout,
    StartQuiz(SubjectId),
    SelectOption(usize),
    SetFillText(String),
    SubmitAnswer,
    /// Next question, or the results once the last answer is graded.
    Advance,
    AbandonQuiz,
    BackToSubjects,
    ShowLeaderboard,
    CloseLeaderboard,
    ShowStats,
    DismissNotification(NotificationId),
}

pub fn use_quiz_dispatch() -> Callback<QuizIntent> {
    let ctx = use_context::<AppContext>();
    let session = use_context::<SessionSignal>();
    let quiz_loop = ctx.quiz_loop();
    use_callback(move |intent: QuizIntent| dispatch_intent(intent, &quiz_loop, session))
}

fn dispatch_intent(intent: QuizIntent, quiz_loop: &Arc<QuizLoopService>, session: SessionSignal) {
    match intent {
        QuizIntent::CheckSession => remote(quiz_loop, session, "check_session", |svc, cell| {
            async move { svc.check_session(&cell).await }
        }),
        QuizIntent::ShowAuth(mode) => session.update(|s| s.show_auth(mode)),
        QuizIntent::CloseAuth => session.update(QuizSession::close_auth),
        QuizIntent::Login { username, password } => {
            remote(quiz_loop, session, "login", move |svc, cell| async move {
                svc.login(&cell, &username, &password).await
            });
        }
        QuizIntent::Register {
            username,
            email,
            password,
        } => remote(quiz_loop, session, "register", move |svc, cell| async move {
            svc.register(&cell, &username, &email, &password).await
        }),
        QuizIntent::Logout => remote(quiz_loop, session, "logout", |svc, cell| async move {
            svc.logout(&cell).await
        }),
        QuizIntent::StartQuiz(subject_id) => {
            remote(quiz_loop, session, "start_quiz", move |svc, cell| async move {
                svc.start_quiz(&cell, subject_id).await
            });
        }
        QuizIntent::SelectOption(index) => {
            local(session, "select_option", |s| s.select_option(index));
        }
        QuizIntent::SetFillText(text) => local(session, "set_fill_text", |s| s.set_fill_text(&text)),
        QuizIntent::SubmitAnswer => {
            remote(quiz_loop, session, "submit_answer", |svc, cell| async move {
                svc.submit_answer(&cell).await
            });
        }
        QuizIntent::Advance => {
            let complete = session
                .signal()
                .peek()
                .attempt()
                .is_some_and(|attempt| attempt.is_complete());
            if complete {
                remote(quiz_loop, session, "finish_quiz", |svc, cell| async move {
                    svc.finish_quiz(&cell).await
                });
            } else {
                local(session, "next_question", QuizSession::next_question);
            }
        }
        QuizIntent::AbandonQuiz => local(session, "abandon_quiz", QuizSession::abandon_quiz),
        QuizIntent::BackToSubjects => {
            remote(quiz_loop, session, "back_to_subjects", |svc, cell| async move {
                svc.back_to_subjects(&cell).await
            });
        }
        QuizIntent::ShowLeaderboard => {
            remote(quiz_loop, session, "show_leaderboard", |svc, cell| async move {
                svc.show_leaderboard(&cell).await
            });
        }
        QuizIntent::CloseLeaderboard => session.update(QuizSession::close_leaderboard),
        QuizIntent::ShowStats => remote(quiz_loop, session, "show_stats", |svc, cell| async move {
            svc.show_stats(&cell).await
        }),
        QuizIntent::DismissNotification(id) => session.update(|s| s.dismiss_notification(id)),
    }
}

fn local(
    session: SessionSignal,
    action: &'static str,
    run: impl FnOnce(&mut QuizSession) -> Result<(), SessionError>,
) {
    if let Err(err) = session.update(run) {
        debug!(action, error = %err, "quiz action refused");
    }
}

/// Errors are already surfaced as notifications by the session.
fn remote<F, Fut>(
    quiz_loop: &Arc<QuizLoopService>,
    session: SessionSignal,
    action: &'static str,
    run: F,
) where
    F: FnOnce(Arc<QuizLoopService>, SessionSignal) -> Fut + 'static,
    Fut: Future<Output = Result<(), SessionError>> + 'static,
{
    let quiz_loop = Arc::clone(quiz_loop);
    spawn(async move {
        if let Err(err) = run(quiz_loop, session).await {
            debug!(action, error = %err, "quiz action failed");
        }
    });
}

/// Clear the toast once its display time is over, unless a newer one replaced it.
pub fn use_toast_timer(dispatch: Callback<QuizIntent>, current: Memo<Option<NotificationId>>) {
    use_effect(move || {
        let Some(id) = current() else {
            return;
        };
        spawn(async move {
            tokio::time::sleep(Duration::from_secs(NOTIFICATION_TTL_SECS.unsigned_abs())).await;
            dispatch.call(QuizIntent::DismissNotification(id));
        });
    });
}
