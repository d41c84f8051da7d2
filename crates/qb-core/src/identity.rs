use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lightweight authenticated session identity for cross-crate passing.
///
/// Produced by `qb-auth`, consumed by `qb-page` and `qb-cli`.
/// Plain data. Sign-in and provider calls live in `qb-auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuthIdentity {
    /// Email address of the signed-in account. Used to look up the
    /// application-level user row.
    pub email: String,
    /// Provider-side user id (GoTrue `user.id`), if the session came from a
    /// password sign-in.
    pub provider_user_id: Option<String>,
    /// Access token forwarded to the backend for row-level security.
    #[serde(skip_serializing)]
    #[schemars(skip)]
    pub access_token: Option<String>,
}

impl AuthIdentity {
    /// Identity carrying only an email (anonymous-key backend access).
    #[must_use]
    pub fn from_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            provider_user_id: None,
            access_token: None,
        }
    }

    /// The email, or `None` when it is blank.
    ///
    /// A blank email cannot resolve a user row, so callers treat it the same
    /// as having no session at all.
    #[must_use]
    pub fn usable_email(&self) -> Option<&str> {
        let email = self.email.trim();
        (!email.is_empty()).then_some(email)
    }
}
