//! Human-readable messages for backend failures, shown in notifications.

use crate::error::BackendError;

/// Turn a backend failure into a short message for the user.
///
/// Structured REST errors show the backend's own message (plus its hint, if
/// any). Transport failures are described by kind rather than by the raw
/// `reqwest` text.
#[must_use]
pub fn error_message(error: &BackendError) -> String {
    match error {
        BackendError::Postgrest { message, hint, .. } => match hint.as_deref() {
            Some(hint) if !hint.trim().is_empty() => format!("{message} ({hint})"),
            _ => message.clone(),
        },
        BackendError::Api { status, message } => {
            let body = message.trim();
            if body.is_empty() {
                format!("The backend returned HTTP {status}")
            } else {
                format!("The backend returned HTTP {status}: {body}")
            }
        }
        BackendError::RateLimited { retry_after_secs } => {
            format!("Too many requests. Try again in {retry_after_secs}s")
        }
        BackendError::Http(e) if e.is_timeout() => "The backend did not respond in time".into(),
        BackendError::Http(e) if e.is_connect() => "Could not reach the backend".into(),
        BackendError::Http(e) => format!("Network error: {e}"),
        BackendError::Decode(_) => "Unexpected response from the backend".into(),
        BackendError::NotConfigured(detail) => format!("Backend is not configured: {detail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn postgrest(hint: Option<&str>) -> BackendError {
        BackendError::Postgrest {
            status: 401,
            code: Some("PGRST301".into()),
            message: "JWT expired".into(),
            details: None,
            hint: hint.map(str::to_string),
        }
    }

    #[rstest]
    #[case(postgrest(None), "JWT expired")]
    #[case(postgrest(Some("")), "JWT expired")]
    #[case(postgrest(Some("Sign in again")), "JWT expired (Sign in again)")]
    #[case(
        BackendError::Api { status: 502, message: "Bad Gateway\n".into() },
        "The backend returned HTTP 502: Bad Gateway"
    )]
    #[case(
        BackendError::Api { status: 503, message: String::new() },
        "The backend returned HTTP 503"
    )]
    #[case(
        BackendError::RateLimited { retry_after_secs: 30 },
        "Too many requests. Try again in 30s"
    )]
    #[case(
        BackendError::Decode("subjects: invalid type".into()),
        "Unexpected response from the backend"
    )]
    fn maps_errors_to_user_messages(#[case] error: BackendError, #[case] expected: &str) {
        assert_eq!(error_message(&error), expected);
    }
}
