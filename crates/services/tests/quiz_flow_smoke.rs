use std::cell::RefCell;
use std::sync::Arc;

use quiz_core::model::{NotificationKind, OptionMark, SubjectId};
use quiz_core::time::fixed_clock;
use services::{
    Endpoint, InMemoryQuizApi, QuizLoopService, QuizSession, Screen, SessionCell, SessionError,
};

const GEOGRAPHY: SubjectId = SubjectId::new(2);
const SCIENCE: SubjectId = SubjectId::new(3);

fn setup() -> (InMemoryQuizApi, QuizLoopService, RefCell<QuizSession>) {
    let api = InMemoryQuizApi::demo().unwrap().with_clock(fixed_clock());
    let loop_svc = QuizLoopService::new(Arc::new(api.clone()));
    let cell = RefCell::new(QuizSession::new(fixed_clock()));
    (api, loop_svc, cell)
}

async fn logged_in() -> (InMemoryQuizApi, QuizLoopService, RefCell<QuizSession>) {
    let (api, loop_svc, cell) = setup();
    loop_svc.login(&cell, "demo", "demo").await.unwrap();
    (api, loop_svc, cell)
}

#[tokio::test]
async fn quiz_scores_exactly_the_earned_points() {
    let (_api, loop_svc, cell) = logged_in().await;
    assert_eq!(cell.borrow().subjects().len(), 3);

    loop_svc.start_quiz(&cell, GEOGRAPHY).await.unwrap();
    assert_eq!(cell.borrow().screen(), Screen::Quiz);

    cell.update(|s| s.select_option(1)).unwrap();
    loop_svc.submit_answer(&cell).await.unwrap();
    {
        let session = cell.borrow();
        let attempt = session.attempt().unwrap();
        assert_eq!(attempt.index(), 1);
        assert_eq!(attempt.score(), 10);
        assert_eq!(session.screen(), Screen::Quiz);
    }

    cell.update(QuizSession::next_question).unwrap();
    cell.update(|s| s.select_option(2)).unwrap();
    cell.update(|s| s.select_option(0)).unwrap();
    loop_svc.submit_answer(&cell).await.unwrap();
    {
        let session = cell.borrow();
        let attempt = session.attempt().unwrap();
        let feedback = attempt.feedback().unwrap();
        assert_eq!(feedback.submitted, "Paris,Berlin");
        assert!(feedback.verdict.correct);
        assert_eq!(
            feedback.marks,
            vec![
                OptionMark::Correct,
                OptionMark::Neutral,
                OptionMark::Correct,
                OptionMark::Neutral
            ]
        );
        assert_eq!(attempt.score(), 30);
        assert!(attempt.is_complete());
    }

    loop_svc.finish_quiz(&cell).await.unwrap();
    let session = cell.borrow();
    assert_eq!(session.screen(), Screen::Results);
    let results = session.results().unwrap();
    assert_eq!(results.score, 30);
    assert_eq!(results.correct, 2);
    assert!((results.percentage - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn single_choice_without_selection_never_reaches_backend() {
    let (api, loop_svc, cell) = logged_in().await;
    loop_svc.start_quiz(&cell, GEOGRAPHY).await.unwrap();
    let before = cell.borrow().attempt().cloned();

    let err = loop_svc.submit_answer(&cell).await.unwrap_err();
    assert!(matches!(err, SessionError::Attempt(_)));
    assert_eq!(api.calls(Endpoint::SubmitAnswer), 0);
    assert_eq!(cell.borrow().attempt().cloned(), before);
}

#[tokio::test]
async fn failed_question_fetch_stays_home_with_one_notification() {
    let (api, loop_svc, cell) = logged_in().await;
    api.fail(Endpoint::ListQuestions);
    let before = cell.borrow().notification().unwrap().id;

    loop_svc.start_quiz(&cell, GEOGRAPHY).await.unwrap_err();

    let session = cell.borrow();
    assert_eq!(session.screen(), Screen::Home);
    assert!(session.attempt().is_none());
    let note = session.notification().unwrap();
    assert_eq!(note.id.value(), before.value() + 1);
    assert_eq!(note.kind, NotificationKind::Error);
    assert_eq!(note.message, "Failed to load questions");
}

#[tokio::test]
async fn logout_mid_quiz_forgets_everything() {
    let (_api, loop_svc, cell) = logged_in().await;
    loop_svc.start_quiz(&cell, SCIENCE).await.unwrap();
    cell.update(|s| s.set_fill_text("H2O")).unwrap();
    loop_svc.submit_answer(&cell).await.unwrap();

    loop_svc.logout(&cell).await.unwrap();

    let session = cell.borrow();
    assert_eq!(session.screen(), Screen::LoggedOut);
    assert!(session.user().is_none());
    assert!(session.subjects().is_empty());
    assert!(session.current_subject().is_none());
    assert!(session.attempt().is_none());
    assert!(session.results().is_none());
}

#[tokio::test]
async fn empty_leaderboard_and_stats_are_reported_as_empty() {
    let (_api, loop_svc, cell) = logged_in().await;

    loop_svc.show_stats(&cell).await.unwrap();
    assert_eq!(cell.borrow().screen(), Screen::Stats);
    assert!(cell.borrow().stats().is_empty());

    loop_svc.back_to_subjects(&cell).await.unwrap();
    loop_svc.start_quiz(&cell, SCIENCE).await.unwrap();
    loop_svc.show_leaderboard(&cell).await.unwrap();
    let session = cell.borrow();
    let panel = session.leaderboard().unwrap();
    assert_eq!(panel.subject, SCIENCE);
    assert!(panel.entries.is_empty());
}

#[tokio::test]
async fn pending_request_blocks_another_call() {
    let (api, loop_svc, cell) = logged_in().await;
    let calls = api.calls(Endpoint::ListSubjects);
    let _ticket = cell.update(QuizSession::begin_stats).unwrap();

    let err = loop_svc.load_subjects(&cell).await.unwrap_err();
    assert!(matches!(err, SessionError::Busy));
    assert_eq!(api.calls(Endpoint::ListSubjects), calls);
}

#[tokio::test]
async fn existing_server_session_is_restored() {
    let api = InMemoryQuizApi::demo().unwrap().signed_in_as("demo");
    let loop_svc = QuizLoopService::new(Arc::new(api));
    let cell = RefCell::new(QuizSession::new(fixed_clock()));

    loop_svc.check_session(&cell).await.unwrap();

    let session = cell.borrow();
    assert_eq!(session.screen(), Screen::Home);
    assert_eq!(session.user().unwrap().username, "demo");
    assert_eq!(session.subjects().len(), 3);
}

#[tokio::test]
async fn bad_credentials_keep_user_logged_out() {
    let (_api, loop_svc, cell) = setup();
    loop_svc.login(&cell, "demo", "wrong").await.unwrap_err();
    let session = cell.borrow();
    assert_eq!(session.screen(), Screen::LoggedOut);
    assert_eq!(session.notification().unwrap().message, "Invalid credentials");
}
