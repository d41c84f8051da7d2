use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AuthError;
use crate::session::StoredSession;

const DEFAULT_KEYRING_SERVICE: &str = "qbank-cli";
const KEYRING_USER: &str = "session";
const SESSION_FILE_NAME: &str = "session";

/// Where a loaded session came from (for status display).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    Config,
    Keyring,
    File,
}

impl SessionSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Keyring => "keyring",
            Self::File => "file",
        }
    }
}

/// Persists the sign-in session. Keyring first, file fallback.
#[derive(Debug, Clone)]
pub struct SessionStore {
    keyring_service: Option<String>,
    file_path: PathBuf,
}

impl SessionStore {
    /// Store backed by the OS keychain and `~/.qbank/session`.
    ///
    /// The keyring service defaults to `"qbank-cli"`. Override via
    /// `QBANK_KEYRING_SERVICE` to keep test runs away from real credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStoreError` if the home directory is unknown.
    pub fn default_location() -> Result<Self, AuthError> {
        let service = std::env::var("QBANK_KEYRING_SERVICE")
            .unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string());
        let file_path = dirs::home_dir()
            .map(|h| h.join(".qbank").join(SESSION_FILE_NAME))
            .ok_or_else(|| {
                AuthError::SessionStoreError(
                    "home directory not found; cannot store session".into(),
                )
            })?;
        Ok(Self {
            keyring_service: Some(service),
            file_path,
        })
    }

    /// File-only store at an explicit path. Never touches the keyring.
    #[must_use]
    pub fn file_only(path: impl Into<PathBuf>) -> Self {
        Self {
            keyring_service: None,
            file_path: path.into(),
        }
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Persist a session. Falls back to the file when the keyring is
    /// unavailable or does not read the value back.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStoreError` if both keyring and file storage fail.
    pub fn store(&self, session: &StoredSession) -> Result<(), AuthError> {
        let json = serde_json::to_string(session)
            .map_err(|e| AuthError::SessionStoreError(format!("serialize session: {e}")))?;

        if let Some(entry) = self.keyring_entry() {
            match entry.set_password(&json) {
                Ok(()) if entry.get_password().is_ok_and(|stored| stored == json) => {
                    return Ok(());
                }
                Ok(()) => {
                    tracing::warn!("keyring did not persist session; falling back to file");
                }
                Err(error) => {
                    tracing::warn!(%error, "keyring store failed; falling back to file");
                }
            }
        }

        self.store_file(&json)
    }

    /// Load the stored session. Priority: keyring → file.
    #[must_use]
    pub fn load(&self) -> Option<(StoredSession, SessionSource)> {
        if let Some(entry) = self.keyring_entry()
            && let Ok(json) = entry.get_password()
            && let Some(session) = parse_session(&json)
        {
            return Some((session, SessionSource::Keyring));
        }

        let json = fs::read_to_string(&self.file_path).ok()?;
        parse_session(&json).map(|session| (session, SessionSource::File))
    }

    /// Delete stored session from keyring and file.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStoreError` if the session file cannot be removed.
    pub fn delete(&self) -> Result<(), AuthError> {
        // May not exist.
        if let Some(entry) = self.keyring_entry() {
            let _ = entry.delete_credential();
        }

        if self.file_path.exists() {
            fs::remove_file(&self.file_path).map_err(|e| {
                AuthError::SessionStoreError(format!(
                    "failed to delete {}: {e}",
                    self.file_path.display()
                ))
            })?;
        }

        Ok(())
    }

    fn keyring_entry(&self) -> Option<keyring::Entry> {
        let service = self.keyring_service.as_deref()?;
        match keyring::Entry::new(service, KEYRING_USER) {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::debug!(%error, "keyring unavailable");
                None
            }
        }
    }

    fn store_file(&self, json: &str) -> Result<(), AuthError> {
        let path = &self.file_path;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::SessionStoreError(format!("mkdir {}: {e}", parent.display()))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }
        fs::write(path, json)
            .map_err(|e| AuthError::SessionStoreError(format!("write {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AuthError::SessionStoreError(format!("chmod {}: {e}", path.display()))
            })?;
        }

        Ok(())
    }
}

fn parse_session(json: &str) -> Option<StoredSession> {
    if json.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<StoredSession>(json) {
        Ok(session) if !session.email.trim().is_empty() => Some(session),
        Ok(_) => None,
        Err(error) => {
            tracing::warn!(%error, "ignoring unreadable stored session");
            None
        }
    }
}
