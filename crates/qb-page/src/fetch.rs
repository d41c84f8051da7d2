//! The two reads of the fetch chain.

use qb_backend::Backend;
use qb_core::entities::{SubjectQuestionJoin, User};

use crate::error::{FetchStage, PageError};

/// Resolve the application user for a session email. First row wins.
///
/// # Errors
///
/// Returns [`PageError::UserNotFound`] when no row matches and
/// [`PageError::Backend`] when the read fails.
pub async fn resolve_user<B: Backend>(
    backend: &B,
    email: &str,
    bearer: Option<&str>,
) -> Result<User, PageError> {
    let users = backend
        .users_by_email(email, bearer)
        .await
        .map_err(|source| PageError::Backend {
            stage: FetchStage::Identity,
            source,
        })?;

    users
        .into_iter()
        .next()
        .ok_or_else(|| PageError::UserNotFound {
            email: email.to_string(),
        })
}

/// Fetch the organization's subjects with nested questions and authors.
///
/// # Errors
///
/// Returns [`PageError::Backend`] when the read fails.
pub async fn fetch_content<B: Backend>(
    backend: &B,
    org_id: i64,
    bearer: Option<&str>,
) -> Result<Vec<SubjectQuestionJoin>, PageError> {
    backend
        .subjects_with_questions(org_id, bearer)
        .await
        .map_err(|source| PageError::Backend {
            stage: FetchStage::Content,
            source,
        })
}

/// Identity resolution, then the content fetch for the resolved organization.
/// The content read is never issued if the first step fails.
pub(crate) async fn run_chain<B: Backend>(
    backend: &B,
    email: &str,
    bearer: Option<&str>,
) -> Result<(User, Vec<SubjectQuestionJoin>), PageError> {
    let user = resolve_user(backend, email, bearer).await?;
    tracing::debug!(user_id = user.id, org_id = user.org_id, "resolved user");
    let subjects = fetch_content(backend, user.org_id, bearer).await?;
    Ok((user, subjects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBackend, user_row};
    use qb_backend::BackendError;

    #[tokio::test]
    async fn first_matching_row_wins() {
        let mut second = user_row(2, 9);
        second.email = "a@x.com".into();
        let backend = FakeBackend::new().with_users(Ok(vec![user_row(1, 7), second]));

        let user = resolve_user(&backend, "a@x.com", None).await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(backend.user_lookups(), ["a@x.com"]);
    }

    #[tokio::test]
    async fn zero_rows_is_user_not_found() {
        let backend = FakeBackend::new().with_users(Ok(Vec::new()));
        let err = resolve_user(&backend, "ghost@x.com", None).await.unwrap_err();
        assert!(matches!(err, PageError::UserNotFound { ref email } if email == "ghost@x.com"));
    }

    #[tokio::test]
    async fn identity_failure_skips_content_read() {
        let backend = FakeBackend::new().with_users(Err(BackendError::Api {
            status: 500,
            message: "boom".into(),
        }));
        let err = run_chain(&backend, "a@x.com", None).await.unwrap_err();
        assert_eq!(err.stage(), FetchStage::Identity);
        assert!(backend.content_lookups().is_empty());
    }

    #[tokio::test]
    async fn content_read_uses_resolved_org_and_bearer() {
        let backend = FakeBackend::new()
            .with_users(Ok(vec![user_row(1, 7)]))
            .with_subjects(Ok(Vec::new()));
        run_chain(&backend, "a@x.com", Some("jwt")).await.unwrap();
        assert_eq!(backend.content_lookups(), [7]);
        assert_eq!(backend.bearers(), [Some("jwt".to_string()), Some("jwt".to_string())]);
    }
}
