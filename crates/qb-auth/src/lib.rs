//! # qb-auth
//!
//! Session handling for qbank.
//!
//! Provides email/password sign-in against the hosted auth provider,
//! session persistence (OS keychain with a private-file fallback), and the
//! process-wide [`SessionContext`] the question page subscribes to.

pub mod context;
pub mod error;
pub mod password;
pub mod session;
pub mod session_store;

pub use context::{SessionContext, SessionSubscription};
pub use error::AuthError;
pub use session::StoredSession;
pub use session_store::{SessionSource, SessionStore};

use qb_core::identity::AuthIdentity;

/// Resolve the identity to browse as.
///
/// Priority: `auth.email` config override → stored session. A stored session
/// that is expired (or within `auth.expiry_buffer_secs` of expiring) yields
/// `None`.
#[must_use]
pub fn resolve_identity(
    config: &qb_config::AuthConfig,
    store: &SessionStore,
) -> Option<(AuthIdentity, SessionSource)> {
    if let Some(email) = config.email_override() {
        return Some((AuthIdentity::from_email(email), SessionSource::Config));
    }

    let (session, source) = store.load()?;
    if session.is_near_expiry(config.expiry_buffer_secs) {
        tracing::warn!(
            expires_at = ?session.expires_at,
            "stored session expires within {}s; sign in again with `qbank auth login`",
            config.expiry_buffer_secs,
        );
        return None;
    }

    Some((session.to_identity(), source))
}

/// Clear the stored session.
///
/// # Errors
///
/// Returns `AuthError::SessionStoreError` if the session file cannot be removed.
pub fn logout(store: &SessionStore) -> Result<(), AuthError> {
    store.delete()
}
