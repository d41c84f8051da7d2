//! Authentication provider configuration.

use serde::{Deserialize, Serialize};

/// Default seconds before expiry at which a stored session counts as stale.
const fn default_expiry_buffer_secs() -> i64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Session email override. When set, it takes the place of a stored
    /// session (useful for CI and read-only anon-key access).
    #[serde(default)]
    pub email: String,

    /// Treat a stored session as expired this many seconds early.
    #[serde(default = "default_expiry_buffer_secs")]
    pub expiry_buffer_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            expiry_buffer_secs: default_expiry_buffer_secs(),
        }
    }
}

impl AuthConfig {
    /// The override email, if one is set.
    pub fn email_override(&self) -> Option<&str> {
        let email = self.email.trim();
        (!email.is_empty()).then_some(email)
    }
}
