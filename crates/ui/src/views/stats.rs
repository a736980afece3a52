use dioxus::prelude::*;

use crate::views::actions::{QuizIntent, use_quiz_dispatch};
use crate::vm::StatsVm;

#[component]
pub fn StatsView(vm: StatsVm) -> Element {
    let dispatch = use_quiz_dispatch();

    rsx! {
        div { class: "page stats-page",
            header { class: "view-header",
                h2 { class: "view-title", "📊 Your Statistics" }
            }
            if let Some(message) = vm.empty_message {
                p { class: "empty-state", "{message}" }
            }
            div { class: "stats-grid",
                for card in vm.cards {
                    div { key: "{card.subject}", class: "stat-card",
                        h3 { "{card.icon} {card.subject}" }
                        div { class: "stat-row",
                            span { class: "stat-label", "Attempts" }
                            span { class: "stat-value", "{card.attempts}" }
                        }
                        div { class: "stat-row",
                            span { class: "stat-label", "Best Score" }
                            span { class: "stat-value", "{card.best_score}" }
                        }
                        div { class: "stat-row",
                            span { class: "stat-label", "Avg Score" }
                            span { class: "stat-value", "{card.avg_score}" }
                        }
                    }
                }
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
