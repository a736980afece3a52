mod answer;
mod attempt;
mod ids;
mod leaderboard;
mod notification;
mod question;
mod subject;
mod user;

pub use answer::{ANSWER_DELIMITER, AnswerDraft, AnswerError, AnswerVerdict, OptionMark, mark_options};
pub use attempt::{
    AnswerFeedback, AttemptError, PendingAnswer, QuizAttempt, QuizResults, QuizSubmission,
};
pub use ids::{NotificationId, ParseIdError, QuestionId, SubjectId};
pub use leaderboard::{LeaderboardEntry, SubjectStats};
pub use notification::{NOTIFICATION_TTL_SECS, Notification, NotificationKind};
pub use question::{Difficulty, Question, QuestionError, QuestionType};
pub use subject::Subject;
pub use user::{Credentials, CredentialsError, Registration, User};
