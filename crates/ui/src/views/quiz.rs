use dioxus::prelude::*;

use crate::views::actions::{QuizIntent, use_quiz_dispatch};
use crate::vm::{QuizInputVm, QuizVm};

#[component]
pub fn QuizView(vm: QuizVm) -> Element {
    let dispatch = use_quiz_dispatch();
    let submit_enabled = vm.submit_enabled;
    let progress_style = format!("width: {:.0}%;", vm.progress_percent);

    rsx! {
        div { class: "page quiz-page",
            div { class: "quiz-header",
                h2 { class: "quiz-subject", "{vm.subject_title}" }
                div { class: "quiz-meta",
                    span { class: "quiz-counter", "{vm.counter_label}" }
                    span { class: "quiz-score", "{vm.score_label}" }
                }
            }
            div { class: "progress-bar",
                div { class: "progress-fill", style: "{progress_style}" }
            }
            div { class: "question-card",
                div { class: "question-badges",
                    span { class: "badge {vm.difficulty_class}", "{vm.difficulty_label}" }
                    span { class: "badge badge-type", "{vm.type_badge}" }
                }
                p { class: "question-text", "{vm.question_text}" }
                match vm.input {
                    QuizInputVm::Choice { multiple, locked, options } => {
                        let input_type = if multiple { "checkbox" } else { "radio" };
                        rsx! {
                            div { class: "options",
                                for option in options {
                                    label {
                                        key: "{option.index}",
                                        class: "{option.class}",
                                        input {
                                            r#type: input_type,
                                            name: "answer",
                                            checked: option.selected,
                                            disabled: locked,
                                            onchange: move |_| dispatch.call(QuizIntent::SelectOption(option.index)),
                                        }
                                        span { class: "option-label", "{option.label}" }
                                    }
                                }
                            }
                        }
                    }
                    QuizInputVm::Fill { text, locked } => rsx! {
                        input {
                            class: "fill-input",
                            r#type: "text",
                            placeholder: "Type your answer...",
                            value: "{text}",
                            disabled: locked,
                            oninput: move |evt| dispatch.call(QuizIntent::SetFillText(evt.value())),
                            onkeydown: move |evt| {
                                if matches!(evt.data.key(), Key::Enter) && submit_enabled {
                                    dispatch.call(QuizIntent::SubmitAnswer);
                                }
                            },
                        }
                    },
                }
                if let Some(feedback) = vm.feedback.as_ref() {
                    div { class: "{feedback.class}", "{feedback.text}" }
                }
            }
            div { class: "quiz-actions",
                button {
                    class: "btn btn-outline",
                    r#type: "button",
                    onclick: move |_| dispatch.call(QuizIntent::AbandonQuiz),
                    "Quit Quiz"
                }
                if let Some(label) = vm.next_label {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| dispatch.call(QuizIntent::Advance),
                        "{label}"
                    }
                } else {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: !submit_enabled,
                        onclick: move |_| dispatch.call(QuizIntent::SubmitAnswer),
                        "Submit Answer"
                    }
                }
            }
        }
    }
}
