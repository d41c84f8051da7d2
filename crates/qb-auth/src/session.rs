use chrono::{DateTime, Utc};
use qb_core::identity::AuthIdentity;
use serde::{Deserialize, Serialize};

/// A persisted sign-in session.
///
/// Produced by password sign-in (or an email-only login), written by
/// [`crate::session_store::SessionStore`], and turned into an
/// [`AuthIdentity`] for the rest of the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub email: String,
    /// Provider-side user id (`user.id` in the token response).
    #[serde(default)]
    pub provider_user_id: Option<String>,
    /// Access token (JWT). `None` for email-only sessions.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token expiry. `None` means the session does not expire.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredSession {
    /// Email-only session: backend access uses the anonymous key.
    #[must_use]
    pub fn email_only(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            provider_user_id: None,
            access_token: None,
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Convert to a lightweight `AuthIdentity` for cross-crate passing.
    #[must_use]
    pub fn to_identity(&self) -> AuthIdentity {
        AuthIdentity {
            email: self.email.clone(),
            provider_user_id: self.provider_user_id.clone(),
            access_token: self.access_token.clone(),
        }
    }

    /// Check if the session is expired or expires within `buffer_secs`.
    #[must_use]
    pub fn is_near_expiry(&self, buffer_secs: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| {
            let threshold = Utc::now() + chrono::TimeDelta::seconds(buffer_secs);
            expires_at <= threshold
        })
    }
}
