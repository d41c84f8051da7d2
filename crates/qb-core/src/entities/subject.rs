use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::QuestionAuthorJoin;

/// A grouping of questions, owned by exactly one organization.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Subject {
    pub id: i64,
    #[serde(default)]
    pub org_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A subject with its questions embedded, each carrying its author projection.
///
/// This is exactly the row shape of the content query; nothing is assembled
/// client-side.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SubjectQuestionJoin {
    #[serde(flatten)]
    pub subject: Subject,
    #[serde(default)]
    pub questions: Vec<QuestionAuthorJoin>,
}

impl SubjectQuestionJoin {
    /// Find a nested question by id.
    #[must_use]
    pub fn question(&self, question_id: i64) -> Option<&QuestionAuthorJoin> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}
