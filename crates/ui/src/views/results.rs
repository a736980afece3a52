use dioxus::prelude::*;

use crate::views::actions::{QuizIntent, use_quiz_dispatch};
use crate::vm::ResultsVm;

#[component]
pub fn ResultsView(vm: ResultsVm) -> Element {
    let dispatch = use_quiz_dispatch();

    rsx! {
        div { class: "page results-page",
            h2 { class: "view-title", "🎉 Quiz Complete!" }
            p { class: "view-subtitle", "{vm.subject_title}" }
            div { class: "results-card",
                div { class: "result-score",
                    span { class: "result-score-value", "{vm.score}" }
                    span { class: "result-score-label", "points" }
                }
                div { class: "result-details",
                    p { "Questions: {vm.total_questions}" }
                    p { "Correct: {vm.correct}" }
                    p { "Percentage: {vm.percentage_label}" }
                }
            }
            div { class: "results-actions",
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| dispatch.call(QuizIntent::ShowLeaderboard),
                    "🏆 View Leaderboard"
                }
                button {
                    class: "btn btn-outline",
                    r#type: "button",
                    onclick: move |_| dispatch.call(QuizIntent::BackToSubjects),
                    "Back to Subjects"
                }
            }
        }
    }
}
