use std::cell::RefCell;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::time::fixed_clock;
use services::{Clock, InMemoryQuizApi, QuizLoopService, QuizSession};

use crate::context::{SessionSignal, UiApp, build_app_context};
use crate::views::{AuthModal, Header, LeaderboardModal, QuizShell, Toast};

struct TestApp {
    quiz_loop: Arc<QuizLoopService>,
}

impl UiApp for TestApp {
    fn app_name(&self) -> &str {
        "QuizMaster"
    }

    fn clock(&self) -> Clock {
        fixed_clock()
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    session: QuizSession,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    let signal = use_signal(|| props.session.clone());
    use_context_provider(|| SessionSignal::new(signal));
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    rsx! {
        Header {}
        QuizShell {}
        AuthModal {}
        LeaderboardModal {}
        Toast {}
    }
}

/// Drives the session through the real loop service before rendering it.
pub struct SessionBuilder {
    pub api: InMemoryQuizApi,
    pub quiz_loop: Arc<QuizLoopService>,
    pub cell: RefCell<QuizSession>,
}

impl SessionBuilder {
    pub fn demo() -> Self {
        let api = InMemoryQuizApi::demo()
            .expect("demo api")
            .with_clock(fixed_clock());
        let quiz_loop = Arc::new(QuizLoopService::new(Arc::new(api.clone())));
        Self {
            api,
            quiz_loop,
            cell: RefCell::new(QuizSession::new(fixed_clock())),
        }
    }

    pub async fn logged_in(self) -> Self {
        self.quiz_loop
            .login(&self.cell, "demo", "demo")
            .await
            .expect("login");
        self
    }

    pub fn render(self) -> ViewHarness {
        let app = Arc::new(TestApp {
            quiz_loop: Arc::clone(&self.quiz_loop),
        });
        let mut dom = VirtualDom::new_with_props(
            ViewRouterHarness,
            ViewHarnessProps {
                app,
                session: self.cell.into_inner(),
            },
        );
        dom.rebuild_in_place();
        drive_dom(&mut dom);
        ViewHarness { dom }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}
