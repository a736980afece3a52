use dioxus::prelude::*;

use crate::views::actions::{QuizIntent, use_quiz_dispatch};
use crate::vm::HomeVm;

#[component]
pub fn HomeView(vm: HomeVm) -> Element {
    let dispatch = use_quiz_dispatch();
    let busy = vm.busy;

    rsx! {
        div { class: "page home-page",
            header { class: "view-header",
                h2 { class: "view-title", "Choose a Subject" }
                p { class: "view-subtitle", "Every answer is graded as you go." }
            }
            if let Some(message) = vm.empty_message {
                p { class: "empty-state", "{message}" }
            }
            div { class: "subjects-grid",
                for card in vm.subjects {
                    button {
                        key: "{card.id.value()}",
                        class: "subject-card",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| dispatch.call(QuizIntent::StartQuiz(card.id)),
                        span { class: "subject-icon", "{card.icon}" }
                        h3 { class: "subject-name", "{card.name}" }
                        p { class: "subject-description", "{card.description}" }
                        if let Some(label) = card.question_count_label.as_ref() {
                            span { class: "subject-count", "{label}" }
                        }
                    }
                }
            }
        }
    }
}
