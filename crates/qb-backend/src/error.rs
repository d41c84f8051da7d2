//! Backend error types.

use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport error (connect, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The REST layer rejected the request with a structured error body.
    #[error("backend error ({status}{}): {message}", code_suffix(.code.as_deref()))]
    Postgrest {
        /// HTTP status code.
        status: u16,
        /// Postgres SQLSTATE or PostgREST `PGRST*` code.
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    /// Non-success status without a structured error body.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The backend returned 429 Too Many Requests.
    #[error("rate limited; retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// A success response could not be decoded into the expected rows.
    #[error("decode error: {0}")]
    Decode(String),

    /// The client was built without a usable backend configuration.
    #[error("backend not configured: {0}")]
    NotConfigured(String),
}

fn code_suffix(code: Option<&str>) -> String {
    code.map(|c| format!(", {c}")).unwrap_or_default()
}
