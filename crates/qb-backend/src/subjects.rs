//! Content read: an organization's subjects with nested questions and authors.

use crate::query::Select;

/// Projection embedding each subject's questions, and each question's author
/// (`email`, `username`) through the `author_id` foreign key.
pub const SUBJECTS_WITH_QUESTIONS: &str = "*, questions(*, author_id(email, username))";

pub(crate) fn with_questions(org_id: i64) -> Select {
    Select::from("subjects")
        .columns(SUBJECTS_WITH_QUESTIONS)
        .eq("org_id", org_id)
}
