use serde::{Deserialize, Serialize};

use crate::model::ids::SubjectId;

/// A quiz subject as listed by the server. Immutable snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Only present when the server reports it.
    pub question_count: Option<u32>,
}

impl Subject {
    #[must_use]
    pub fn new(
        id: SubjectId,
        name: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            icon: icon.into(),
            question_count: None,
        }
    }

    #[must_use]
    pub fn with_question_count(mut self, count: u32) -> Self {
        self.question_count = Some(count);
        self
    }
}
