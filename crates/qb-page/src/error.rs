//! Fetch chain error types.

use std::fmt;

use qb_backend::BackendError;
use thiserror::Error;

/// Which read of the chain failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Identity,
    Content,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Identity => "identity lookup",
            Self::Content => "content fetch",
        })
    }
}

/// Failure of the identity → content chain.
///
/// Kinds are kept apart for logs and tests; the user sees one notification
/// either way.
#[derive(Debug, Error)]
pub enum PageError {
    /// No `users` row matches the session email.
    #[error("User not found")]
    UserNotFound { email: String },

    /// A backend read failed.
    #[error("{stage} failed: {source}")]
    Backend {
        stage: FetchStage,
        #[source]
        source: BackendError,
    },
}

impl PageError {
    /// Message for the notification surface.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UserNotFound { .. } => "User not found".to_string(),
            Self::Backend { source, .. } => qb_backend::error_message(source),
        }
    }

    #[must_use]
    pub const fn stage(&self) -> FetchStage {
        match self {
            Self::UserNotFound { .. } => FetchStage::Identity,
            Self::Backend { stage, .. } => *stage,
        }
    }
}
