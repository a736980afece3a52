use dioxus::prelude::*;
use services::AuthMode;

use crate::context::SessionSignal;
use crate::views::actions::{QuizIntent, use_quiz_dispatch, use_toast_timer};
use crate::vm::{AuthFormVm, map_auth_form, map_leaderboard, map_notification};

#[component]
pub fn AuthModal() -> Element {
    let session = use_context::<SessionSignal>();
    let mode = session.signal().read().auth_form();

    match mode {
        Some(mode) => rsx! { AuthForm { vm: map_auth_form(mode) } },
        None => rsx! {},
    }
}

#[component]
fn AuthForm(vm: AuthFormVm) -> Element {
    let dispatch = use_quiz_dispatch();
    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mode = vm.mode;
    let switch_to = vm.switch_to;

    let mut submit = move || {
        let intent = match mode {
            AuthMode::Login => QuizIntent::Login {
                username: username(),
                password: password(),
            },
            AuthMode::Register => QuizIntent::Register {
                username: username(),
                email: email(),
                password: password(),
            },
        };
        password.set(String::new());
        dispatch.call(intent);
    };

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal auth-modal",
                div { class: "modal-header",
                    h2 { "{vm.title}" }
                    button {
                        class: "modal-close",
                        r#type: "button",
                        onclick: move |_| dispatch.call(QuizIntent::CloseAuth),
                        "×"
                    }
                }
                form {
                    class: "auth-form",
                    onsubmit: move |evt| {
                        evt.prevent_default();
                        submit();
                    },
                    input {
                        r#type: "text",
                        placeholder: "Username",
                        value: "{username}",
                        oninput: move |evt| username.set(evt.value()),
                    }
                    if vm.show_email {
                        input {
                            r#type: "email",
                            placeholder: "Email",
                            value: "{email}",
                            oninput: move |evt| email.set(evt.value()),
                        }
                    }
                    input {
                        r#type: "password",
                        placeholder: "Password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                    button { class: "btn btn-primary btn-block", r#type: "submit", "{vm.submit_label}" }
                }
                p { class: "auth-switch",
                    "{vm.switch_prompt} "
                    button {
                        class: "link-button",
                        r#type: "button",
                        onclick: move |_| dispatch.call(QuizIntent::ShowAuth(switch_to)),
                        "{vm.switch_label}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn LeaderboardModal() -> Element {
    let session = use_context::<SessionSignal>();
    let dispatch = use_quiz_dispatch();
    let vm = session.signal().read().leaderboard().map(map_leaderboard);
    let Some(vm) = vm else {
        return rsx! {};
    };

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal leaderboard-modal",
                div { class: "modal-header",
                    h2 { "{vm.title}" }
                    button {
                        class: "modal-close",
                        r#type: "button",
                        onclick: move |_| dispatch.call(QuizIntent::CloseLeaderboard),
                        "×"
                    }
                }
                if let Some(message) = vm.empty_message {
                    p { class: "empty-state", "{message}" }
                }
                ol { class: "leaderboard",
                    for row in vm.rows {
                        li { key: "{row.rank}", class: "leaderboard-row",
                            span { class: "leaderboard-rank", "#{row.rank}" }
                            span { class: "leaderboard-user", "{row.username}" }
                            span { class: "leaderboard-date", "{row.date_label}" }
                            span { class: "leaderboard-score", "{row.score_label}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn Toast() -> Element {
    let session = use_context::<SessionSignal>();
    let dispatch = use_quiz_dispatch();
    let current = use_memo(move || session.signal().read().notification().map(|n| n.id));
    use_toast_timer(dispatch, current);

    let vm = map_notification(session.signal().read().notification());
    match vm {
        Some(vm) => rsx! {
            div { class: "{vm.class}", "{vm.message}" }
        },
        None => rsx! {},
    }
}
