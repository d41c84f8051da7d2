//! Email/password sign-in against the hosted auth provider (GoTrue).
//!
//! Calls `POST {url}/auth/v1/token?grant_type=password` directly via
//! `reqwest` and turns the token response into a [`StoredSession`].

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AuthError;
use crate::session::StoredSession;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    /// Seconds since the epoch.
    #[serde(default)]
    expires_at: Option<i64>,
    /// Seconds from now; used when `expires_at` is absent.
    #[serde(default)]
    expires_in: Option<i64>,
    user: TokenUser,
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// The provider has used several error body shapes across versions.
#[derive(Deserialize)]
struct ProviderError {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Sign in with email and password.
///
/// Does not persist the session; the caller decides where it goes.
///
/// # Errors
///
/// Returns `AuthError::NotConfigured` if the backend url or key is missing and
/// `AuthError::SignInFailed` if the request fails or the provider rejects the
/// credentials.
pub async fn sign_in(
    config: &qb_config::BackendConfig,
    email: &str,
    password: &str,
) -> Result<StoredSession, AuthError> {
    config
        .validate()
        .map_err(|e| AuthError::NotConfigured(e.to_string()))?;

    let url = format!("{}/auth/v1/token?grant_type=password", config.base_url());
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AuthError::SignInFailed(format!("build client: {e}")))?;

    tracing::debug!(%url, email, "password sign-in");
    let resp = client
        .post(&url)
        .header("apikey", &config.anon_key)
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .map_err(|e| AuthError::SignInFailed(format!("request: {e}")))?;

    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(sign_in_error(status.as_u16(), &body));
    }

    session_from_token_body(&body, email, Utc::now())
}

fn session_from_token_body(
    body: &str,
    requested_email: &str,
    now: DateTime<Utc>,
) -> Result<StoredSession, AuthError> {
    let token: TokenResponse = serde_json::from_str(body)
        .map_err(|e| AuthError::SignInFailed(format!("parse token response: {e}")))?;

    let expires_at = token
        .expires_at
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .or_else(|| {
            token
                .expires_in
                .map(|secs| now + chrono::TimeDelta::seconds(secs))
        });

    Ok(StoredSession {
        email: token
            .user
            .email
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| requested_email.to_string()),
        provider_user_id: Some(token.user.id),
        access_token: Some(token.access_token),
        refresh_token: token.refresh_token,
        expires_at,
    })
}

fn sign_in_error(status: u16, body: &str) -> AuthError {
    let detail = serde_json::from_str::<ProviderError>(body)
        .ok()
        .and_then(|e| e.error_description.or(e.msg).or(e.message).or(e.error))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "no response body".to_string()
            } else {
                body.trim().to_string()
            }
        });
    AuthError::SignInFailed(format!("HTTP {status}: {detail}"))
}
