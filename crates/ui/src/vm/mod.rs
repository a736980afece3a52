mod overlay_vm;
mod screen_vm;
mod time_fmt;

pub use overlay_vm::{
    AuthFormVm, LeaderboardRowVm, LeaderboardVm, NO_SCORES, NotificationVm, map_auth_form,
    map_leaderboard, map_notification,
};
pub use screen_vm::{
    FeedbackVm, HeaderVm, HomeVm, NO_STATS, NO_SUBJECTS, OptionVm, QuizInputVm, QuizVm,
    ResultsVm, ScreenVm, StatCardVm, StatsVm, SubjectCardVm, map_header, map_screen, type_badge,
};
pub use time_fmt::{format_datetime, format_percent};
