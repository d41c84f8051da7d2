//! Hosted Postgres (PostgREST) backend configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_timeout_secs() -> u64 {
    10
}

fn default_schema() -> String {
    "public".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Project URL (e.g., `https://abcd.supabase.co`). The REST and auth
    /// paths are appended to it.
    #[serde(default)]
    pub url: String,

    /// Public anonymous API key, sent as `apikey` on every request.
    #[serde(default)]
    pub anon_key: String,

    /// Postgres schema exposed through the REST surface.
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            schema: default_schema(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Check if the backend config has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }

    /// Project URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Validate the section for use by a client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when url or key is missing, and
    /// [`ConfigError::InvalidValue`] for a non-HTTP url or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "backend".into(),
            });
        }
        if !(self.url.starts_with("https://") || self.url.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                field: "backend.url".into(),
                reason: format!("expected an http(s) URL, got '{}'", self.url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backend.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = BackendConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.schema, "public");
        assert_eq!(config.timeout_secs, 10);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }

    #[test]
    fn configured_when_url_and_key_set() {
        let config = BackendConfig {
            url: "https://abcd.supabase.co/".into(),
            anon_key: "anon".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert_eq!(config.base_url(), "https://abcd.supabase.co");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_http_url() {
        let config = BackendConfig {
            url: "postgres://db".into(),
            anon_key: "anon".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("backend.url"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = BackendConfig {
            url: "http://localhost:54321".into(),
            anon_key: "anon".into(),
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
