use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::{AuthModal, Header, LeaderboardModal, QuizShell, Toast};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", QuizShell)] Home {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Header {}
            main { class: "content",
                Outlet::<Route> {}
            }
            AuthModal {}
            LeaderboardModal {}
            Toast {}
        }
    }
}
