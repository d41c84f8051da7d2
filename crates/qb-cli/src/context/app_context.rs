use anyhow::Context;
use qb_auth::{SessionContext, SessionStore};
use qb_backend::BackendClient;
use qb_config::QbConfig;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: QbConfig,
    pub backend: BackendClient,
    pub session: SessionContext,
}

impl AppContext {
    /// Build the backend client and seed the session from config or the
    /// stored session.
    pub fn init(config: QbConfig) -> anyhow::Result<Self> {
        let backend = BackendClient::new(&config.backend).context(
            "backend is not usable; set QBANK_BACKEND__URL and QBANK_BACKEND__ANON_KEY",
        )?;
        let store = SessionStore::default_location().context("failed to locate session store")?;

        let identity = qb_auth::resolve_identity(&config.auth, &store).map(|(identity, source)| {
            tracing::debug!(email = %identity.email, source = source.as_str(), "session resolved");
            identity
        });

        Ok(Self {
            config,
            backend,
            session: SessionContext::new(identity),
        })
    }
}
