use chrono::{DateTime, Duration, Utc};

use crate::model::ids::NotificationId;

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL_SECS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// Transient message shown over the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    #[must_use]
    pub fn new(
        id: NotificationId,
        kind: NotificationKind,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            message: message.into(),
            expires_at: now + Duration::seconds(NOTIFICATION_TTL_SECS),
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn expires_after_ttl() {
        let now = fixed_now();
        let n = Notification::new(NotificationId::new(1), NotificationKind::Info, "hi", now);
        assert!(!n.is_expired(now + Duration::seconds(2)));
        assert!(n.is_expired(now + Duration::seconds(NOTIFICATION_TTL_SECS)));
    }
}
