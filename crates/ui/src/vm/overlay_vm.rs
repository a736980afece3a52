use quiz_core::model::{Notification, NotificationId};
use services::{AuthMode, LeaderboardPanel};

use crate::vm::time_fmt::{format_datetime, format_percent};

pub const NO_SCORES: &str = "No scores yet. Be the first!";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationVm {
    pub id: NotificationId,
    pub class: String,
    pub message: String,
}

#[must_use]
pub fn map_notification(notification: Option<&Notification>) -> Option<NotificationVm> {
    notification.map(|n| NotificationVm {
        id: n.id,
        class: format!("toast {} show", n.kind.as_str()),
        message: n.message.clone(),
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardRowVm {
    pub rank: usize,
    pub username: String,
    pub date_label: String,
    pub score_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardVm {
    pub title: String,
    pub rows: Vec<LeaderboardRowVm>,
    pub empty_message: Option<&'static str>,
}

/// Rows keep the server's order; ranks start at 1.
#[must_use]
pub fn map_leaderboard(panel: &LeaderboardPanel) -> LeaderboardVm {
    let rows = panel
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| LeaderboardRowVm {
            rank: index + 1,
            username: entry.username.clone(),
            date_label: format_datetime(entry.completed_at),
            score_label: format_percent(entry.percentage),
        })
        .collect::<Vec<_>>();
    let title = if panel.subject_name.is_empty() {
        "🏆 Leaderboard".to_string()
    } else {
        format!("🏆 Leaderboard: {}", panel.subject_name)
    };
    LeaderboardVm {
        title,
        empty_message: rows.is_empty().then_some(NO_SCORES),
        rows,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthFormVm {
    pub mode: AuthMode,
    pub title: &'static str,
    pub submit_label: &'static str,
    pub show_email: bool,
    pub switch_prompt: &'static str,
    pub switch_label: &'static str,
    pub switch_to: AuthMode,
}

#[must_use]
pub fn map_auth_form(mode: AuthMode) -> AuthFormVm {
    match mode {
        AuthMode::Login => AuthFormVm {
            mode,
            title: "Login",
            submit_label: "Login",
            show_email: false,
            switch_prompt: "Don't have an account?",
            switch_label: "Register",
            switch_to: AuthMode::Register,
        },
        AuthMode::Register => AuthFormVm {
            mode,
            title: "Register",
            submit_label: "Register",
            show_email: true,
            switch_prompt: "Already have an account?",
            switch_label: "Login",
            switch_to: AuthMode::Login,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{LeaderboardEntry, NotificationKind, SubjectId};
    use quiz_core::time::fixed_now;

    #[test]
    fn empty_leaderboard_has_message() {
        let vm = map_leaderboard(&LeaderboardPanel {
            subject: SubjectId::new(1),
            subject_name: "Rust".into(),
            entries: Vec::new(),
        });
        assert_eq!(vm.title, "🏆 Leaderboard: Rust");
        assert_eq!(vm.empty_message, Some(NO_SCORES));
    }

    #[test]
    fn leaderboard_ranks_in_server_order() {
        let entry = |name: &str, percentage| LeaderboardEntry {
            username: name.into(),
            percentage,
            completed_at: fixed_now(),
        };
        let vm = map_leaderboard(&LeaderboardPanel {
            subject: SubjectId::new(1),
            subject_name: String::new(),
            entries: vec![entry("ann", 90.0), entry("bob", 95.0)],
        });
        assert_eq!(vm.empty_message, None);
        assert_eq!(vm.rows[0].rank, 1);
        assert_eq!(vm.rows[0].username, "ann");
        assert_eq!(vm.rows[1].score_label, "95.0%");
    }

    #[test]
    fn notification_class_carries_kind() {
        let note = Notification::new(
            NotificationId::new(4),
            NotificationKind::Error,
            "Failed to load subjects",
            fixed_now(),
        );
        let vm = map_notification(Some(&note)).unwrap();
        assert_eq!(vm.class, "toast error show");
        assert_eq!(map_notification(None), None);
    }

    #[test]
    fn register_form_asks_for_email() {
        let vm = map_auth_form(AuthMode::Register);
        assert!(vm.show_email);
        assert_eq!(vm.switch_to, AuthMode::Login);
        assert!(!map_auth_form(AuthMode::Login).show_email);
    }
}
