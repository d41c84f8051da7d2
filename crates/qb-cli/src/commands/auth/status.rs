use chrono::{DateTime, Utc};
use qb_auth::{SessionSource, SessionStore, StoredSession};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    email: Option<String>,
    source: Option<&'static str>,
    access_token: bool,
    expires_at: Option<String>,
    expires_in_secs: Option<i64>,
    note: Option<String>,
}

pub fn handle(
    flags: &GlobalFlags,
    config: &qb_config::QbConfig,
    store: &SessionStore,
) -> anyhow::Result<()> {
    let resolved = qb_auth::resolve_identity(&config.auth, store);
    let stored = store.load().map(|(session, _)| session);
    let status = build_status(
        resolved.map(|(identity, source)| (identity.email, source)),
        stored.as_ref(),
        Utc::now(),
    );
    output(&status, flags.format)
}

fn build_status(
    resolved: Option<(String, SessionSource)>,
    stored: Option<&StoredSession>,
    now: DateTime<Utc>,
) -> AuthStatusResponse {
    match resolved {
        Some((email, source)) => {
            // Expiry only applies to the stored session, not a config override.
            let session = stored.filter(|_| source != SessionSource::Config);
            let expires_at = session.and_then(|session| session.expires_at);
            AuthStatusResponse {
                authenticated: true,
                email: Some(email),
                source: Some(source.as_str()),
                access_token: session.is_some_and(|session| session.access_token.is_some()),
                expires_at: expires_at.map(|at| at.to_rfc3339()),
                expires_in_secs: expires_at.map(|at| (at - now).num_seconds()),
                note: None,
            }
        }
        None => AuthStatusResponse {
            authenticated: false,
            email: None,
            source: None,
            access_token: false,
            expires_at: None,
            expires_in_secs: None,
            note: Some(if stored.is_some() {
                "stored session has expired; run `qbank auth login`".to_string()
            } else {
                "no session found; run `qbank auth login --email <email>`".to_string()
            }),
        },
    }
}
