//! Entity structs for the qbank backend rows.
//!
//! Each plain entity maps to a table exposed by the backend (`users`,
//! `subjects`, `questions`). The join types are the read-only shapes the
//! content query returns with related rows embedded inline. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema`.
//!
//! Every column other than `id` is tolerated as missing: the backend selects
//! `*` and the schema is owned elsewhere.

mod question;
mod subject;
mod user;

pub use question::{AuthorProjection, Question, QuestionAuthorJoin};
pub use subject::{Subject, SubjectQuestionJoin};
pub use user::User;
