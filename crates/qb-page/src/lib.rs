//! # qb-page
//!
//! The question page, independent of how it is drawn.
//!
//! [`QuestionPage`] owns the [`ViewState`], runs the identity → content
//! fetch chain against a [`qb_backend::Backend`], reports failures through a
//! [`Notifier`], and follows the session through
//! [`qb_auth::SessionContext`]. Renderers read state snapshots and call back
//! with layout toggles, selections, and refresh requests.

pub mod error;
pub mod fetch;
pub mod notify;
pub mod page;
pub mod state;

#[cfg(test)]
mod test_support;

pub use error::{FetchStage, PageError};
pub use fetch::{fetch_content, resolve_user};
pub use notify::{Notification, Notifier, RecordingNotifier};
pub use page::{FetchOutcome, QuestionPage};
pub use state::{Content, ViewState};
