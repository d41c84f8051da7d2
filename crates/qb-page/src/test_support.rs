//! Shared test utilities for qb-page tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use qb_backend::{Backend, BackendError};
use qb_core::entities::{
    AuthorProjection, QuestionAuthorJoin, Subject, SubjectQuestionJoin, User,
};
use tokio::sync::oneshot;

struct Scripted<T> {
    result: Result<T, BackendError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Backend that replays scripted results in call order.
///
/// Gated results wait until the paired sender fires (or is dropped) before
/// returning, which lets tests hold a chain in flight.
#[derive(Default)]
pub struct FakeBackend {
    users: Mutex<VecDeque<Scripted<Vec<User>>>>,
    subjects: Mutex<VecDeque<Scripted<Vec<SubjectQuestionJoin>>>>,
    user_lookups: Mutex<Vec<String>>,
    content_lookups: Mutex<Vec<i64>>,
    bearers: Mutex<Vec<Option<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(self, result: Result<Vec<User>, BackendError>) -> Self {
        lock(&self.users).push_back(Scripted { result, gate: None });
        self
    }

    pub fn with_users_gated(
        self,
        result: Result<Vec<User>, BackendError>,
    ) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        lock(&self.users).push_back(Scripted {
            result,
            gate: Some(rx),
        });
        (self, tx)
    }

    pub fn with_subjects(self, result: Result<Vec<SubjectQuestionJoin>, BackendError>) -> Self {
        lock(&self.subjects).push_back(Scripted { result, gate: None });
        self
    }

    pub fn with_subjects_gated(
        self,
        result: Result<Vec<SubjectQuestionJoin>, BackendError>,
    ) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        lock(&self.subjects).push_back(Scripted {
            result,
            gate: Some(rx),
        });
        (self, tx)
    }

    pub fn user_lookups(&self) -> Vec<String> {
        lock(&self.user_lookups).clone()
    }

    pub fn content_lookups(&self) -> Vec<i64> {
        lock(&self.content_lookups).clone()
    }

    pub fn bearers(&self) -> Vec<Option<String>> {
        lock(&self.bearers).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.user_lookups).len() + lock(&self.content_lookups).len()
    }
}

async fn replay<T>(queue: &Mutex<VecDeque<Scripted<T>>>, what: &str) -> Result<T, BackendError> {
    let scripted = lock(queue)
        .pop_front()
        .unwrap_or_else(|| panic!("unexpected {what} read"));
    if let Some(gate) = scripted.gate {
        let _ = gate.await;
    }
    scripted.result
}

impl Backend for FakeBackend {
    async fn users_by_email(
        &self,
        email: &str,
        bearer: Option<&str>,
    ) -> Result<Vec<User>, BackendError> {
        lock(&self.user_lookups).push(email.to_string());
        lock(&self.bearers).push(bearer.map(str::to_string));
        replay(&self.users, "users").await
    }

    async fn subjects_with_questions(
        &self,
        org_id: i64,
        bearer: Option<&str>,
    ) -> Result<Vec<SubjectQuestionJoin>, BackendError> {
        lock(&self.content_lookups).push(org_id);
        lock(&self.bearers).push(bearer.map(str::to_string));
        replay(&self.subjects, "subjects").await
    }
}

pub fn user_row(id: i64, org_id: i64) -> User {
    User {
        id,
        email: format!("user{id}@x.com"),
        org_id,
        username: None,
        created_at: None,
    }
}

pub fn question_row(id: i64, subject_id: i64, title: &str, author: &str) -> QuestionAuthorJoin {
    QuestionAuthorJoin {
        id,
        subject_id: Some(subject_id),
        author: AuthorProjection {
            email: format!("{author}@x.com"),
            username: Some(author.to_string()),
        },
        title: title.to_string(),
        content: String::new(),
        created_at: None,
    }
}

pub fn subject_row(id: i64, name: &str, questions: Vec<QuestionAuthorJoin>) -> SubjectQuestionJoin {
    SubjectQuestionJoin {
        subject: Subject {
            id,
            org_id: Some(7),
            name: name.to_string(),
            created_at: None,
        },
        questions,
    }
}

pub fn server_error() -> BackendError {
    BackendError::Postgrest {
        status: 500,
        code: Some("XX000".into()),
        message: "internal error".into(),
        details: None,
        hint: None,
    }
}
