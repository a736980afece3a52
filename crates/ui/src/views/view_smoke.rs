use quiz_core::model::SubjectId;
use services::{AuthMode, Endpoint, QuizSession, SessionCell};

use super::test_harness::SessionBuilder;

const GEOGRAPHY: SubjectId = SubjectId::new(2);

#[tokio::test(flavor = "current_thread")]
async fn logged_out_shows_welcome_and_auth_buttons() {
    let harness = SessionBuilder::demo().render();
    let html = harness.render();
    assert!(html.contains("Login to Start"), "missing hero in {html}");
    assert!(html.contains("Register"), "missing register button in {html}");
    assert!(!html.contains("Logout"), "unexpected logout in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_lists_subjects_for_signed_in_user() {
    let harness = SessionBuilder::demo().logged_in().await.render();
    let html = harness.render();
    assert!(html.contains("👤 demo"), "missing user in {html}");
    assert!(html.contains("Geography"), "missing subject in {html}");
    assert!(html.contains("2 questions"), "missing count in {html}");
    assert!(html.contains("📊 My Stats"), "missing stats button in {html}");
}

fn button_tag<'a>(html: &'a str, label: &str) -> &'a str {
    let end = html
        .find(&format!(">{label}<"))
        .unwrap_or_else(|| panic!("missing {label} in {html}"));
    let start = html[..end].rfind("<button").unwrap();
    &html[start..end]
}

#[tokio::test(flavor = "current_thread")]
async fn header_buttons_disabled_while_request_pending() {
    let builder = SessionBuilder::demo().logged_in().await;
    builder.cell.update(QuizSession::begin_stats).unwrap();

    let html = builder.render().render();
    assert!(
        button_tag(&html, "Logout").contains("disabled"),
        "logout enabled in {html}"
    );
    assert!(
        button_tag(&html, "📊 My Stats").contains("disabled"),
        "stats enabled in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn graded_answer_shows_feedback_and_next_button() {
    let builder = SessionBuilder::demo().logged_in().await;
    builder
        .quiz_loop
        .start_quiz(&builder.cell, GEOGRAPHY)
        .await
        .unwrap();
    builder.cell.update(|s| s.select_option(1)).unwrap();
    builder.quiz_loop.submit_answer(&builder.cell).await.unwrap();

    let html = builder.render().render();
    assert!(html.contains("Question 1 of 2"), "missing counter in {html}");
    assert!(html.contains("Score: 10"), "missing score in {html}");
    assert!(
        html.contains("You earned 10 points"),
        "missing feedback in {html}"
    );
    assert!(html.contains("option correct"), "missing mark in {html}");
    assert!(html.contains("Next Question"), "missing next in {html}");
    assert!(!html.contains("My Stats"), "stats offered mid-quiz in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn finished_quiz_shows_results_and_leaderboard() {
    let builder = SessionBuilder::demo().logged_in().await;
    let (quiz_loop, cell) = (&builder.quiz_loop, &builder.cell);
    quiz_loop.start_quiz(cell, GEOGRAPHY).await.unwrap();
    cell.update(|s| s.select_option(1)).unwrap();
    quiz_loop.submit_answer(cell).await.unwrap();
    cell.update(QuizSession::next_question).unwrap();
    cell.update(|s| s.select_option(0)).unwrap();
    cell.update(|s| s.select_option(2)).unwrap();
    quiz_loop.submit_answer(cell).await.unwrap();
    quiz_loop.finish_quiz(cell).await.unwrap();
    quiz_loop.show_leaderboard(cell).await.unwrap();

    let html = builder.render().render();
    assert!(html.contains("Quiz Complete!"), "missing results in {html}");
    assert!(html.contains("Percentage: 100.0%"), "missing percent in {html}");
    assert!(
        html.contains("🏆 Leaderboard: Geography"),
        "missing leaderboard in {html}"
    );
    assert!(html.contains("leaderboard-row"), "missing row in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn empty_stats_render_placeholder() {
    let builder = SessionBuilder::demo().logged_in().await;
    builder.quiz_loop.show_stats(&builder.cell).await.unwrap();

    let html = builder.render().render();
    assert!(html.contains("Your Statistics"), "missing title in {html}");
    assert!(html.contains("No quiz attempts yet"), "missing empty text in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn register_form_asks_for_email() {
    let builder = SessionBuilder::demo();
    builder.cell.update(|s| s.show_auth(AuthMode::Register));

    let html = builder.render().render();
    assert!(html.contains("auth-modal"), "missing modal in {html}");
    assert!(html.contains("Email"), "missing email field in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn failed_question_fetch_shows_error_toast() {
    let builder = SessionBuilder::demo().logged_in().await;
    builder.api.fail(Endpoint::ListQuestions);
    builder
        .quiz_loop
        .start_quiz(&builder.cell, GEOGRAPHY)
        .await
        .unwrap_err();

    let html = builder.render().render();
    assert!(html.contains("toast error show"), "missing toast in {html}");
    assert!(
        html.contains("Failed to load questions"),
        "missing message in {html}"
    );
    assert!(html.contains("Geography"), "left the subject grid in {html}");
}
