//! Shared HTTP response helpers for backend queries.
//!
//! Centralizes status-code checks (429 rate limiting with `Retry-After`
//! parsing, structured PostgREST error bodies, plain non-success bodies) and
//! row decoding so the query modules stay focused on request construction.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::BackendError;

/// Error body returned by the REST layer.
#[derive(Deserialize)]
struct PostgrestErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`BackendError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 60 s).
/// - **Non-success with a JSON error body** → [`BackendError::Postgrest`].
/// - **Any other non-success** → [`BackendError::Api`] with the raw body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    if resp.status() == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(BackendError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(error_from_body(status, body));
    }
    Ok(resp)
}

/// Read the body and decode it as a JSON array of rows.
pub async fn decode_rows<T: DeserializeOwned>(
    resp: reqwest::Response,
    table: &str,
) -> Result<Vec<T>, BackendError> {
    let body = resp.text().await?;
    parse_rows(&body, table)
}

pub(crate) fn parse_rows<T: DeserializeOwned>(
    body: &str,
    table: &str,
) -> Result<Vec<T>, BackendError> {
    serde_json::from_str(body).map_err(|e| BackendError::Decode(format!("{table}: {e}")))
}

fn error_from_body(status: u16, body: String) -> BackendError {
    match serde_json::from_str::<PostgrestErrorBody>(&body) {
        Ok(parsed) => BackendError::Postgrest {
            status,
            code: parsed.code,
            message: parsed.message,
            details: parsed.details,
            hint: parsed.hint,
        },
        Err(_) => BackendError::Api {
            status,
            message: body,
        },
    }
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}
