use dioxus::prelude::*;
use dioxus_router::Router;
use services::QuizSession;

use crate::context::{AppContext, SessionSignal};
use crate::routes::Route;
use crate::views::{QuizIntent, use_quiz_dispatch};

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let signal = use_signal(|| QuizSession::new(ctx.clock()));
    use_context_provider(|| SessionSignal::new(signal));
    let dispatch = use_quiz_dispatch();

    // Restore an existing server session once at startup.
    use_hook(move || dispatch.call(QuizIntent::CheckSession));

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "{ctx.app_name()}" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
