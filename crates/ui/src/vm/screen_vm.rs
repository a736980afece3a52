use quiz_core::model::{
    ANSWER_DELIMITER, AnswerFeedback, Difficulty, OptionMark, QuestionType, QuizAttempt,
    QuizResults, Subject, SubjectId, SubjectStats,
};
use services::{QuizSession, Screen};

use crate::vm::time_fmt::format_percent;

pub const NO_SUBJECTS: &str = "No subjects available yet.";
pub const NO_STATS: &str = "No quiz attempts yet. Take a quiz to see your statistics.";

/// What the main area shows, derived from the session alone.
#[derive(Clone, Debug, PartialEq)]
pub enum ScreenVm {
    Welcome,
    Home(HomeVm),
    Quiz(QuizVm),
    Results(ResultsVm),
    Stats(StatsVm),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderVm {
    pub username: Option<String>,
    pub can_show_stats: bool,
    pub busy: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectCardVm {
    pub id: SubjectId,
    pub icon: String,
    pub name: String,
    pub description: String,
    pub question_count_label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomeVm {
    pub subjects: Vec<SubjectCardVm>,
    pub empty_message: Option<&'static str>,
    pub busy: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: String,
    pub selected: bool,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizInputVm {
    Choice {
        multiple: bool,
        locked: bool,
        options: Vec<OptionVm>,
    },
    Fill {
        text: String,
        locked: bool,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub correct: bool,
    pub class: &'static str,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    pub subject_title: String,
    pub counter_label: String,
    pub score_label: String,
    pub progress_percent: f64,
    pub difficulty_label: String,
    pub difficulty_class: String,
    pub type_badge: &'static str,
    pub question_text: String,
    pub input: QuizInputVm,
    pub feedback: Option<FeedbackVm>,
    pub submit_enabled: bool,
    /// Label of the button that replaces submit once the answer is graded.
    pub next_label: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub subject_title: String,
    pub score: u32,
    pub total_questions: usize,
    pub correct: u32,
    pub percentage_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatCardVm {
    pub subject: String,
    pub icon: String,
    pub attempts: String,
    pub best_score: String,
    pub avg_score: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsVm {
    pub cards: Vec<StatCardVm>,
    pub empty_message: Option<&'static str>,
}

#[must_use]
pub fn map_header(session: &QuizSession) -> HeaderVm {
    HeaderVm {
        username: session.user().map(|user| user.username.clone()),
        can_show_stats: session.user().is_some()
            && matches!(
                session.screen(),
                Screen::Home | Screen::Results | Screen::Stats
            ),
        busy: session.is_busy(),
    }
}

#[must_use]
pub fn map_screen(session: &QuizSession) -> ScreenVm {
    match session.screen() {
        Screen::LoggedOut => ScreenVm::Welcome,
        Screen::Home => ScreenVm::Home(map_home(session)),
        Screen::Quiz => session.attempt().map_or_else(
            || ScreenVm::Home(map_home(session)),
            |attempt| ScreenVm::Quiz(map_quiz(attempt, session.is_busy())),
        ),
        Screen::Results => session.results().map_or_else(
            || ScreenVm::Home(map_home(session)),
            |results| ScreenVm::Results(map_results(results)),
        ),
        Screen::Stats => ScreenVm::Stats(map_stats(session.stats())),
    }
}

fn subject_title(subject: &Subject) -> String {
    if subject.icon.is_empty() {
        subject.name.clone()
    } else {
        format!("{} {}", subject.icon, subject.name)
    }
}

fn map_home(session: &QuizSession) -> HomeVm {
    let subjects = session
        .subjects()
        .iter()
        .map(|subject| SubjectCardVm {
            id: subject.id,
            icon: subject.icon.clone(),
            name: subject.name.clone(),
            description: subject.description.clone(),
            question_count_label: subject.question_count.map(|count| match count {
                1 => "1 question".to_string(),
                n => format!("{n} questions"),
            }),
        })
        .collect::<Vec<_>>();
    HomeVm {
        empty_message: subjects.is_empty().then_some(NO_SUBJECTS),
        subjects,
        busy: session.is_busy(),
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[must_use]
pub fn type_badge(kind: QuestionType) -> &'static str {
    match kind {
        QuestionType::Single => "📝 Single Choice",
        QuestionType::Multiple => "☑️ Multiple Choice",
        QuestionType::Fill => "✍️ Fill in the Blank",
    }
}

fn option_class(selected: bool, mark: OptionMark) -> &'static str {
    match (mark, selected) {
        (OptionMark::Correct, _) => "option correct",
        (OptionMark::IncorrectSelected, _) => "option incorrect",
        (OptionMark::Neutral, true) => "option selected",
        (OptionMark::Neutral, false) => "option",
    }
}

fn feedback_text(feedback: &AnswerFeedback) -> FeedbackVm {
    let verdict = &feedback.verdict;
    let text = if verdict.correct {
        format!("✓ Correct! You earned {} points!", verdict.earned_points)
    } else {
        format!(
            "✗ Incorrect. The correct answer is: {}",
            verdict.correct_answer
        )
    };
    FeedbackVm {
        correct: verdict.correct,
        class: if verdict.correct {
            "feedback correct"
        } else {
            "feedback incorrect"
        },
        text,
    }
}

#[allow(clippy::cast_precision_loss)]
fn map_quiz(attempt: &QuizAttempt, busy: bool) -> QuizVm {
    let total = attempt.total_questions();
    let position = attempt.displayed_index();
    let feedback = attempt.feedback();
    let locked = feedback.is_some() || attempt.is_submitting();
    let draft = attempt.draft();

    let (question_text, difficulty, kind, input) = match attempt.displayed_question() {
        Some(question) => {
            let input = if question.kind().is_choice() {
                let marks = feedback.map(|f| f.marks.as_slice()).unwrap_or_default();
                let submitted = feedback.map(|f| f.submitted.as_str());
                let options = question
                    .options()
                    .iter()
                    .enumerate()
                    .map(|(index, label)| {
                        let mark = marks.get(index).copied().unwrap_or(OptionMark::Neutral);
                        let selected = match submitted {
                            Some(answer) => answer
                                .split(ANSWER_DELIMITER)
                                .any(|part| part.trim() == label.as_str()),
                            None => draft.is_selected(index),
                        };
                        OptionVm {
                            index,
                            label: label.clone(),
                            selected,
                            class: option_class(selected, mark),
                        }
                    })
                    .collect();
                QuizInputVm::Choice {
                    multiple: question.kind() == QuestionType::Multiple,
                    locked,
                    options,
                }
            } else {
                let text = feedback.map_or_else(|| draft.text().to_string(), |f| f.submitted.clone());
                QuizInputVm::Fill { text, locked }
            };
            (
                question.text().to_string(),
                question.difficulty().clone(),
                question.kind(),
                input,
            )
        }
        None => (
            String::new(),
            Difficulty::Other(String::new()),
            QuestionType::Fill,
            QuizInputVm::Fill {
                text: String::new(),
                locked: true,
            },
        ),
    };

    QuizVm {
        subject_title: subject_title(attempt.subject()),
        counter_label: format!("Question {} of {total}", position + 1),
        score_label: format!("Score: {}", attempt.score()),
        progress_percent: position as f64 / total as f64 * 100.0,
        difficulty_label: capitalize(difficulty.as_str()),
        difficulty_class: difficulty.as_str().to_lowercase(),
        type_badge: type_badge(kind),
        question_text,
        input,
        feedback: feedback.map(feedback_text),
        submit_enabled: !locked && !busy,
        next_label: feedback.map(|_| {
            if attempt.is_complete() {
                "See Results"
            } else {
                "Next Question"
            }
        }),
    }
}

fn map_results(results: &QuizResults) -> ResultsVm {
    ResultsVm {
        subject_title: subject_title(&results.subject),
        score: results.score,
        total_questions: results.total_questions,
        correct: results.correct,
        percentage_label: format_percent(results.percentage),
    }
}

fn map_stats(stats: &[SubjectStats]) -> StatsVm {
    let cards = stats
        .iter()
        .map(|stat| StatCardVm {
            subject: stat.subject.clone(),
            icon: stat.icon.clone(),
            attempts: stat.attempts.to_string(),
            best_score: format_percent(stat.best_score),
            avg_score: format_percent(stat.avg_score),
        })
        .collect::<Vec<_>>();
    StatsVm {
        empty_message: cards.is_empty().then_some(NO_STATS),
        cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerVerdict, Question, QuestionId, User};
    use quiz_core::time::fixed_clock;

    fn session_in_quiz(kind: QuestionType) -> QuizSession {
        let mut session = QuizSession::new(fixed_clock());
        let (ticket, _) = session.begin_login("ann", "pw").unwrap();
        session.complete_login(ticket, Ok(User::new("ann"))).unwrap();
        let ticket = session.begin_load_subjects().unwrap();
        session
            .complete_load_subjects(
                ticket,
                Ok(vec![Subject::new(SubjectId::new(1), "Geography", "", "🌍")]),
            )
            .unwrap();
        let ticket = session.begin_start_quiz(SubjectId::new(1)).unwrap();
        let questions = (1..=2)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    "Capital of France?",
                    kind,
                    vec!["Paris".into(), "Berlin".into(), "Rome".into()],
                    Difficulty::parse("medium"),
                )
                .unwrap()
            })
            .collect();
        session.complete_start_quiz(ticket, Ok(questions)).unwrap();
        session
    }

    fn grade(session: &mut QuizSession, correct: bool) {
        let (ticket, _) = session.begin_submit_answer().unwrap();
        session
            .complete_submit_answer(
                ticket,
                Ok(AnswerVerdict {
                    correct,
                    correct_answer: "Paris".into(),
                    earned_points: if correct { 10 } else { 0 },
                }),
            )
            .unwrap();
    }

    fn quiz_vm(session: &QuizSession) -> QuizVm {
        match map_screen(session) {
            ScreenVm::Quiz(vm) => vm,
            other => panic!("expected quiz screen, got {other:?}"),
        }
    }

    #[test]
    fn logged_out_shows_welcome() {
        let session = QuizSession::new(fixed_clock());
        assert_eq!(map_screen(&session), ScreenVm::Welcome);
        assert_eq!(map_header(&session).username, None);
    }

    #[test]
    fn header_is_busy_while_request_pending() {
        let mut session = session_in_quiz(QuestionType::Single);
        session.abandon_quiz().unwrap();
        assert!(!map_header(&session).busy);

        let ticket = session.begin_stats().unwrap();
        let header = map_header(&session);
        assert!(header.busy);
        assert_eq!(header.username.as_deref(), Some("ann"));

        session.complete_stats(ticket, Ok(Vec::new())).unwrap();
        assert!(!map_header(&session).busy);
    }

    #[test]
    fn quiz_labels_follow_position() {
        let mut session = session_in_quiz(QuestionType::Single);
        let vm = quiz_vm(&session);
        assert_eq!(vm.counter_label, "Question 1 of 2");
        assert_eq!(vm.score_label, "Score: 0");
        assert_eq!(vm.difficulty_label, "Medium");
        assert_eq!(vm.type_badge, "📝 Single Choice");
        assert!(vm.progress_percent.abs() < f64::EPSILON);
        assert!(vm.submit_enabled);
        assert_eq!(vm.next_label, None);

        session.select_option(0).unwrap();
        grade(&mut session, true);
        let vm = quiz_vm(&session);
        assert_eq!(vm.counter_label, "Question 1 of 2");
        assert_eq!(vm.score_label, "Score: 10");
        assert_eq!(vm.next_label, Some("Next Question"));
        assert!(!vm.submit_enabled);
        assert_eq!(
            vm.feedback.unwrap().text,
            "✓ Correct! You earned 10 points!"
        );

        session.next_question().unwrap();
        let vm = quiz_vm(&session);
        assert_eq!(vm.counter_label, "Question 2 of 2");
        assert!((vm.progress_percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn wrong_choice_is_marked() {
        let mut session = session_in_quiz(QuestionType::Single);
        session.select_option(1).unwrap();
        grade(&mut session, false);
        let vm = quiz_vm(&session);
        let QuizInputVm::Choice {
            options, locked, ..
        } = vm.input
        else {
            panic!("expected choice input");
        };
        assert!(locked);
        let classes: Vec<_> = options.iter().map(|o| o.class).collect();
        assert_eq!(classes, vec!["option correct", "option incorrect", "option"]);
        assert_eq!(
            vm.feedback.unwrap().text,
            "✗ Incorrect. The correct answer is: Paris"
        );
    }

    #[test]
    fn fill_input_keeps_draft_text() {
        let mut session = session_in_quiz(QuestionType::Fill);
        session.set_fill_text("Par").unwrap();
        let vm = quiz_vm(&session);
        assert_eq!(vm.type_badge, "✍️ Fill in the Blank");
        assert_eq!(
            vm.input,
            QuizInputVm::Fill {
                text: "Par".into(),
                locked: false
            }
        );
    }

    #[test]
    fn last_answer_offers_results() {
        let mut session = session_in_quiz(QuestionType::Multiple);
        for _ in 0..2 {
            session.select_option(0).unwrap();
            grade(&mut session, true);
            if session.next_question().is_err() {
                break;
            }
        }
        assert_eq!(quiz_vm(&session).next_label, Some("See Results"));
    }

    #[test]
    fn empty_stats_have_message() {
        let vm = map_stats(&[]);
        assert_eq!(vm.empty_message, Some(NO_STATS));

        let vm = map_stats(&[SubjectStats {
            subject: "Rust".into(),
            icon: "🦀".into(),
            attempts: 3,
            best_score: 90.0,
            avg_score: 72.5,
        }]);
        assert_eq!(vm.empty_message, None);
        assert_eq!(vm.cards[0].best_score, "90.0%");
        assert_eq!(vm.cards[0].avg_score, "72.5%");
    }

    #[test]
    fn capitalize_handles_empty() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("hard"), "Hard");
    }
}
