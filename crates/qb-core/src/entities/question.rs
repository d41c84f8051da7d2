use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A question row as stored, with its author as a foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    #[serde(default)]
    pub subject_id: Option<i64>,
    pub author_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Reduced view of a user embedded into a question by the backend join.
/// Never fetched or mutated on its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthorProjection {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl AuthorProjection {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

/// A question whose `author_id` column has been replaced by the embedded
/// author projection.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionAuthorJoin {
    pub id: i64,
    #[serde(default)]
    pub subject_id: Option<i64>,
    /// Keeps the backend's key name: the join embeds the author under the
    /// foreign-key column.
    #[serde(rename = "author_id", default)]
    pub author: AuthorProjection,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl QuestionAuthorJoin {
    /// Title for cards and list rows, falling back to the first content line.
    #[must_use]
    pub fn headline(&self) -> &str {
        if !self.title.trim().is_empty() {
            return self.title.trim();
        }
        self.content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("(untitled)")
    }
}
