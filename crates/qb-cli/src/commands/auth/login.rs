use std::io::BufRead;

use anyhow::Context;
use qb_auth::{SessionStore, StoredSession};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    email: String,
    access_token: bool,
    expires_at: Option<String>,
}

const PASSWORD_ENV: &str = "QBANK_AUTH__PASSWORD";

/// An empty variable counts as unset.
fn password_from_env(value: Option<String>) -> Option<String> {
    value.filter(|password| !password.is_empty())
}

/// First line of `reader`, without its line ending.
fn read_password(mut reader: impl BufRead) -> anyhow::Result<Option<String>> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("auth login: --password-stdin given but no password was read");
    }
    Ok(Some(password.to_string()))
}

pub async fn handle(
    args: &AuthLoginArgs,
    flags: &GlobalFlags,
    config: &qb_config::QbConfig,
    store: &SessionStore,
) -> anyhow::Result<()> {
    let email = args.email.trim();
    if email.is_empty() {
        anyhow::bail!("auth login: --email must not be blank");
    }

    let password = if args.password_stdin {
        read_password(std::io::stdin().lock())?
    } else {
        password_from_env(std::env::var(PASSWORD_ENV).ok())
    };

    let session = match password.as_deref() {
        Some(password) => qb_auth::password::sign_in(&config.backend, email, password)
            .await
            .context("auth login failed")?,
        None => {
            tracing::debug!(email, "storing email-only session");
            StoredSession::email_only(email)
        }
    };

    store.store(&session).context("failed to store session")?;

    output(
        &AuthLoginResponse {
            authenticated: true,
            email: session.email,
            access_token: session.access_token.is_some(),
            expires_at: session.expires_at.map(|at| at.to_rfc3339()),
        },
        flags.format,
    )
}
