use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not signed in; run `qbank auth login --email <email>`")]
    NotAuthenticated,

    #[error("session expired; run `qbank auth login` to sign in again")]
    SessionExpired,

    #[error("sign-in failed: {0}")]
    SignInFailed(String),

    #[error("keyring error: {0}")]
    KeyringError(String),

    #[error("session store error: {0}")]
    SessionStoreError(String),

    #[error("auth provider not configured: {0}")]
    NotConfigured(String),

    #[error("{0}")]
    Other(String),
}
