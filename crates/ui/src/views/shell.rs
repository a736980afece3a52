use dioxus::prelude::*;
use services::AuthMode;

use crate::context::{AppContext, SessionSignal};
use crate::views::actions::{QuizIntent, use_quiz_dispatch};
use crate::views::{HomeView, QuizView, ResultsView, StatsView};
use crate::vm::{ScreenVm, map_header, map_screen};

/// Picks the screen for the current session state.
#[component]
pub fn QuizShell() -> Element {
    let session = use_context::<SessionSignal>();
    let screen = map_screen(&session.signal().read());

    match screen {
        ScreenVm::Welcome => rsx! { WelcomeView {} },
        ScreenVm::Home(vm) => rsx! { HomeView { vm } },
        ScreenVm::Quiz(vm) => rsx! { QuizView { vm } },
        ScreenVm::Results(vm) => rsx! { ResultsView { vm } },
        ScreenVm::Stats(vm) => rsx! { StatsView { vm } },
    }
}

#[component]
pub fn Header() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<SessionSignal>();
    let dispatch = use_quiz_dispatch();
    let vm = map_header(&session.signal().read());
    let busy = vm.busy;

    rsx! {
        header { class: "navbar",
            div { class: "nav-brand", "🧠 {ctx.app_name()}" }
            div { class: "nav-actions",
                if let Some(username) = vm.username {
                    span { class: "nav-user", "👤 {username}" }
                    if vm.can_show_stats {
                        button {
                            class: "btn btn-outline",
                            r#type: "button",
                            disabled: busy,
                            onclick: move |_| dispatch.call(QuizIntent::ShowStats),
                            "📊 My Stats"
                        }
                    }
                    button {
                        class: "btn btn-outline",
                        r#type: "button",
                        disabled: busy,
                        onclick: move |_| dispatch.call(QuizIntent::Logout),
                        "Logout"
                    }
                } else {
                    button {
                        class: "btn btn-outline",
                        r#type: "button",
                        onclick: move |_| dispatch.call(QuizIntent::ShowAuth(AuthMode::Login)),
                        "Login"
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| dispatch.call(QuizIntent::ShowAuth(AuthMode::Register)),
                        "Register"
                    }
                }
            }
        }
    }
}

#[component]
fn WelcomeView() -> Element {
    let dispatch = use_quiz_dispatch();

    rsx! {
        section { class: "page hero",
            h1 { "Test Your Knowledge" }
            p { "Pick a subject, answer questions and climb the leaderboard." }
            button {
                class: "btn btn-primary btn-large",
                r#type: "button",
                onclick: move |_| dispatch.call(QuizIntent::ShowAuth(AuthMode::Login)),
                "Login to Start"
            }
        }
    }
}
