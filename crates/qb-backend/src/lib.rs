//! # qb-backend
//!
//! HTTP client for the hosted Postgres backend's REST surface (PostgREST).
//!
//! Exposes the two reads the question page performs:
//! - users by email (identity resolution)
//! - subjects by organization, with nested questions and author projections
//!
//! The [`Backend`] trait is the seam the page depends on; [`BackendClient`]
//! is the production implementation.

mod error;
mod http;
mod message;
pub mod query;
mod subjects;
mod users;

pub use error::BackendError;
pub use message::error_message;
pub use subjects::SUBJECTS_WITH_QUESTIONS;

use std::future::Future;
use std::time::Duration;

use qb_core::entities::{SubjectQuestionJoin, User};

use crate::http::{check_response, decode_rows};
use crate::query::Select;

/// Reads the question page issues against the backend.
///
/// `bearer` is the signed-in session's access token; `None` sends the
/// anonymous key in its place.
pub trait Backend: Send + Sync {
    /// User rows whose `email` equals `email`.
    fn users_by_email(
        &self,
        email: &str,
        bearer: Option<&str>,
    ) -> impl Future<Output = Result<Vec<User>, BackendError>> + Send;

    /// The organization's subjects, each with its questions and
    /// their authors embedded. Backend ordering is preserved.
    fn subjects_with_questions(
        &self,
        org_id: i64,
        bearer: Option<&str>,
    ) -> impl Future<Output = Result<Vec<SubjectQuestionJoin>, BackendError>> + Send;
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for the REST surface. Stateless per call.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    rest_url: String,
    anon_key: String,
    schema: String,
}

impl BackendClient {
    /// Build a client from validated backend configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotConfigured`] if the configuration is
    /// incomplete or invalid, and [`BackendError::Http`] if the underlying
    /// `reqwest::Client` fails to build.
    pub fn new(config: &qb_config::BackendConfig) -> Result<Self, BackendError> {
        config
            .validate()
            .map_err(|e| BackendError::NotConfigured(e.to_string()))?;

        let http = reqwest::Client::builder()
            .user_agent("qbank/0.1")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", config.base_url()),
            anon_key: config.anon_key.clone(),
            schema: config.schema.clone(),
        })
    }

    /// Full request URL for a read.
    #[must_use]
    pub fn url_for(&self, select: &Select) -> String {
        format!("{}/{}", self.rest_url, select.path_and_query())
    }

    /// Run a read and decode the rows.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the request fails, the backend returns a
    /// non-success status, or the body is not an array of `T`.
    pub async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        select: &Select,
        bearer: Option<&str>,
    ) -> Result<Vec<T>, BackendError> {
        let url = self.url_for(select);
        tracing::debug!(%url, table = select.table(), "backend read");

        let token = bearer.unwrap_or(&self.anon_key);
        let resp = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
            .header(reqwest::header::ACCEPT, "application/json")
            .header("Accept-Profile", &self.schema)
            .send()
            .await?;

        let rows = decode_rows(check_response(resp).await?, select.table()).await?;
        tracing::debug!(table = select.table(), rows = rows.len(), "backend read done");
        Ok(rows)
    }
}

impl Backend for BackendClient {
    async fn users_by_email(
        &self,
        email: &str,
        bearer: Option<&str>,
    ) -> Result<Vec<User>, BackendError> {
        self.fetch(&users::by_email(email), bearer).await
    }

    async fn subjects_with_questions(
        &self,
        org_id: i64,
        bearer: Option<&str>,
    ) -> Result<Vec<SubjectQuestionJoin>, BackendError> {
        self.fetch(&subjects::with_questions(org_id), bearer).await
    }
}
