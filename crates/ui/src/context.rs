use std::sync::Arc;

use dioxus::prelude::*;
use services::{Clock, QuizLoopService, QuizSession, SessionCell};

pub trait UiApp: Send + Sync {
    fn app_name(&self) -> &str;
    fn clock(&self) -> Clock;
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
}

#[derive(Clone)]
pub struct AppContext {
    app_name: String,
    clock: Clock,
    quiz_loop: Arc<QuizLoopService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            app_name: app.app_name().to_string(),
            clock: app.clock(),
            quiz_loop: app.quiz_loop(),
        }
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}

// Provided by the composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// The session as a reactive signal shared by every view.
#[derive(Clone, Copy, PartialEq)]
pub struct SessionSignal(Signal<QuizSession>);

impl SessionSignal {
    #[must_use]
    pub fn new(signal: Signal<QuizSession>) -> Self {
        Self(signal)
    }

    #[must_use]
    pub fn signal(&self) -> Signal<QuizSession> {
        self.0
    }
}

impl SessionCell for SessionSignal {
    fn update<R>(&self, f: impl FnOnce(&mut QuizSession) -> R) -> R {
        let mut signal = self.0;
        let mut session = signal.write();
        f(&mut session)
    }
}
