use pretty_assertions::assert_eq;
use qb_auth::SessionContext;
use qb_core::enums::{LayoutType, Severity};
use qb_core::identity::AuthIdentity;

use super::*;
use crate::error::FetchStage;
use crate::notify::RecordingNotifier;
use crate::state::Content;
use crate::test_support::{FakeBackend, question_row, server_error, subject_row, user_row};

type TestPage = QuestionPage<FakeBackend, RecordingNotifier>;

fn signed_in(email: &str) -> SessionContext {
    SessionContext::new(Some(AuthIdentity::from_email(email)))
}

fn page(backend: FakeBackend, session: SessionContext) -> TestPage {
    QuestionPage::new(backend, RecordingNotifier::new(), session, LayoutType::Grid)
}

fn math_subjects() -> Vec<qb_core::entities::SubjectQuestionJoin> {
    vec![subject_row(1, "Math", vec![question_row(10, 1, "Sum", "ann")])]
}

#[tokio::test]
async fn no_session_issues_no_reads() {
    let page = page(FakeBackend::new(), SessionContext::default());

    let outcome = page.refetch().await;

    assert!(matches!(outcome, FetchOutcome::NoSession));
    assert_eq!(page.backend().call_count(), 0);
    assert!(!page.state().loading);
    assert!(page.notifier().shown().is_empty());
}

#[tokio::test]
async fn blank_session_email_issues_no_reads() {
    let page = page(FakeBackend::new(), signed_in("   "));
    assert!(matches!(page.refetch().await, FetchOutcome::NoSession));
    assert_eq!(page.backend().call_count(), 0);
}

#[tokio::test]
async fn scenario_single_subject_single_question() {
    let mut ann = user_row(1, 7);
    ann.email = "a@x.com".into();
    let backend = FakeBackend::new()
        .with_users(Ok(vec![ann.clone()]))
        .with_subjects(Ok(math_subjects()));
    let page = page(backend, signed_in("a@x.com"));

    let outcome = page.refetch().await;

    assert!(matches!(
        outcome,
        FetchOutcome::Committed {
            subjects: 1,
            questions: 1
        }
    ));
    assert_eq!(page.backend().user_lookups(), ["a@x.com"]);
    assert_eq!(page.backend().content_lookups(), [7]);

    let state = page.state();
    assert_eq!(state.user, Some(ann));
    assert!(!state.loading);
    assert!(state.header_visible());
    match state.content() {
        Content::Collection { layout, subjects } => {
            assert_eq!(layout, LayoutType::Grid);
            assert_eq!(subjects.len(), 1);
            assert_eq!(subjects[0].subject.name, "Math");
            assert_eq!(subjects[0].questions[0].title, "Sum");
            assert_eq!(subjects[0].questions[0].author.display_name(), "ann");
        }
        other => panic!("expected collection, got {other:?}"),
    }
    assert!(page.notifier().shown().is_empty());
}

#[tokio::test]
async fn loading_is_true_only_while_the_chain_runs() {
    let (backend, release) = FakeBackend::new().with_users_gated(Ok(vec![user_row(1, 7)]));
    let backend = backend.with_subjects(Ok(math_subjects()));
    let page = page(backend, signed_in("user1@x.com"));
    let mut rx = page.watch();

    let observe = async {
        let _ = rx.wait_for(|state| state.loading).await;
        assert!(page.state().subjects_with_questions.is_empty());
        let _ = release.send(());
        let _ = rx.wait_for(|state| !state.loading).await;
    };
    let (outcome, ()) = tokio::join!(page.refetch(), observe);

    assert!(matches!(outcome, FetchOutcome::Committed { .. }));
    assert!(!page.state().loading);
    assert_eq!(page.state().question_count(), 1);
}

#[tokio::test]
async fn identity_failure_leaves_state_and_notifies_once() {
    let backend = FakeBackend::new()
        .with_users(Ok(vec![user_row(1, 7)]))
        .with_subjects(Ok(math_subjects()))
        .with_users(Err(server_error()));
    let page = page(backend, signed_in("user1@x.com"));
    page.refetch().await;
    let before = page.state();

    let outcome = page.refetch().await;

    assert!(matches!(outcome, FetchOutcome::Failed(ref e) if e.stage() == FetchStage::Identity));
    assert_eq!(page.state(), before);
    assert_eq!(page.backend().content_lookups(), [7]);

    let shown = page.notifier().shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Error!");
    assert_eq!(shown[0].message, "internal error");
    assert_eq!(shown[0].severity, Severity::Error);
}

#[tokio::test]
async fn user_not_found_notifies_fixed_message() {
    let backend = FakeBackend::new().with_users(Ok(Vec::new()));
    let page = page(backend, signed_in("ghost@x.com"));

    let outcome = page.refetch().await;

    assert!(matches!(outcome, FetchOutcome::Failed(PageError::UserNotFound { .. })));
    assert!(!page.state().loading);
    assert!(page.state().user.is_none());
    assert_eq!(page.backend().content_lookups(), Vec::<i64>::new());
    let shown = page.notifier().shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].message, "User not found");
}

#[tokio::test]
async fn content_failure_on_first_load_commits_nothing() {
    let backend = FakeBackend::new()
        .with_users(Ok(vec![user_row(1, 7)]))
        .with_subjects(Err(server_error()));
    let page = page(backend, signed_in("user1@x.com"));

    let outcome = page.refetch().await;

    assert!(matches!(outcome, FetchOutcome::Failed(ref e) if e.stage() == FetchStage::Content));
    let state = page.state();
    assert!(state.user.is_none());
    assert!(state.subjects_with_questions.is_empty());
    assert!(!state.loading);
    assert_eq!(page.notifier().shown().len(), 1);
}

#[tokio::test]
async fn content_failure_discards_user_resolved_in_same_chain() {
    let backend = FakeBackend::new()
        .with_users(Ok(vec![user_row(1, 7)]))
        .with_subjects(Ok(math_subjects()))
        .with_users(Ok(vec![user_row(2, 8)]))
        .with_subjects(Err(server_error()));
    let page = page(backend, signed_in("user1@x.com"));
    page.refetch().await;
    let before = page.state();

    let outcome = page.refetch().await;

    assert!(matches!(outcome, FetchOutcome::Failed(ref e) if e.stage() == FetchStage::Content));
    assert_eq!(page.backend().content_lookups(), [7, 8]);
    let state = page.state();
    assert_eq!(state, before);
    assert_eq!(state.user.as_ref().map(|u| u.id), Some(1));
    assert_eq!(state.question_count(), 1);
    assert_eq!(page.notifier().shown().len(), 1);
}

#[tokio::test]
async fn refetch_with_unchanged_backend_is_idempotent() {
    let backend = FakeBackend::new()
        .with_users(Ok(vec![user_row(1, 7)]))
        .with_subjects(Ok(math_subjects()))
        .with_users(Ok(vec![user_row(1, 7)]))
        .with_subjects(Ok(math_subjects()));
    let page = page(backend, signed_in("user1@x.com"));

    page.refetch().await;
    let first = page.state();
    page.refetch().await;

    assert_eq!(page.state(), first);
    assert_eq!(page.backend().call_count(), 4);
}

#[tokio::test]
async fn selection_is_cleared_when_refetch_removes_question() {
    let backend = FakeBackend::new()
        .with_users(Ok(vec![user_row(1, 7)]))
        .with_subjects(Ok(vec![subject_row(
            1,
            "Math",
            vec![question_row(10, 1, "Sum", "ann"), question_row(11, 1, "Product", "bob")],
        )]))
        .with_users(Ok(vec![user_row(1, 7)]))
        .with_subjects(Ok(math_subjects()));
    let page = page(backend, signed_in("user1@x.com"));
    page.refetch().await;

    assert!(page.select_question(11));
    assert!(!page.state().header_visible());

    page.refetch().await;

    assert!(page.state().selected.is_none());
    assert!(page.state().header_visible());
}

#[tokio::test]
async fn select_back_and_toggle_through_the_controller() {
    let backend = FakeBackend::new()
        .with_users(Ok(vec![user_row(1, 7)]))
        .with_subjects(Ok(math_subjects()));
    let page = page(backend, signed_in("user1@x.com"));
    page.refetch().await;

    assert!(!page.select_question(99));
    assert!(page.select_question(10));
    assert!(matches!(page.state().content(), Content::Detail { question, .. } if question.id == 10));

    page.back();
    assert!(page.state().header_visible());

    page.toggle_layout();
    assert_eq!(page.state().layout, LayoutType::List);
    page.toggle_layout();
    assert_eq!(page.state().layout, LayoutType::Grid);
}

#[tokio::test]
async fn stale_chain_never_commits() {
    let (backend, release) = FakeBackend::new().with_users_gated(Ok(vec![user_row(1, 7)]));
    let backend = backend
        .with_users(Ok(vec![user_row(2, 8)]))
        .with_subjects(Ok(vec![subject_row(2, "Physics", Vec::new())]))
        .with_subjects(Ok(math_subjects()));
    let page = page(backend, signed_in("user1@x.com"));
    let mut rx = page.watch();

    let newer = async {
        let _ = rx.wait_for(|state| state.loading).await;
        let outcome = page.refetch().await;
        let _ = release.send(());
        outcome
    };
    let (stale, latest) = tokio::join!(page.refetch(), newer);

    assert!(matches!(stale, FetchOutcome::Superseded));
    assert!(matches!(latest, FetchOutcome::Committed { .. }));
    let state = page.state();
    assert_eq!(state.user.map(|u| u.id), Some(2));
    assert_eq!(state.subjects_with_questions[0].subject.name, "Physics");
    assert!(!state.loading);
}

#[tokio::test]
async fn superseded_failure_does_not_notify() {
    let (backend, release) = FakeBackend::new().with_users_gated(Err(server_error()));
    let backend = backend
        .with_users(Ok(vec![user_row(2, 8)]))
        .with_subjects(Ok(math_subjects()));
    let page = page(backend, signed_in("user1@x.com"));
    let mut rx = page.watch();

    let newer = async {
        let _ = rx.wait_for(|state| state.loading).await;
        page.refetch().await;
        let _ = release.send(());
    };
    let (stale, ()) = tokio::join!(page.refetch(), newer);

    assert!(matches!(stale, FetchOutcome::Superseded));
    assert!(page.notifier().shown().is_empty());
    assert_eq!(page.state().question_count(), 1);
}

#[tokio::test]
async fn run_follows_sign_in_and_sign_out() {
    let session = SessionContext::default();
    let backend = FakeBackend::new()
        .with_users(Ok(vec![user_row(1, 7)]))
        .with_subjects(Ok(math_subjects()));
    let page = page(backend, session.clone());
    let subscription = session.subscribe();
    let mut rx = page.watch();

    let drive = async {
        session.sign_in(AuthIdentity::from_email("user1@x.com"));
        let _ = rx.wait_for(|state| state.user.is_some() && !state.loading).await;
        assert_eq!(page.state().question_count(), 1);

        session.sign_out();
        let _ = rx.wait_for(|state| state.user.is_none()).await;
    };

    tokio::select! {
        () = page.run(subscription) => panic!("effect loop ended while the session was alive"),
        () = drive => {}
    }

    let state = page.state();
    assert!(state.subjects_with_questions.is_empty());
    assert!(!state.loading);
    assert_eq!(page.backend().user_lookups(), ["user1@x.com"]);
}

#[tokio::test]
async fn run_fetches_for_identity_present_at_mount() {
    let session = signed_in("user1@x.com");
    let backend = FakeBackend::new()
        .with_users(Ok(vec![user_row(1, 7)]))
        .with_subjects(Ok(math_subjects()));
    let page = page(backend, session.clone());
    let subscription = session.subscribe();
    let mut rx = page.watch();

    tokio::select! {
        () = page.run(subscription) => panic!("effect loop ended while the session was alive"),
        _ = rx.wait_for(|state| state.user.is_some()) => {}
    }

    assert_eq!(page.backend().content_lookups(), [7]);
}

#[tokio::test]
async fn identity_change_mid_fetch_abandons_the_chain() {
    let session = signed_in("user1@x.com");
    let (backend, _held) = FakeBackend::new().with_users_gated(Ok(vec![user_row(1, 7)]));
    let backend = backend
        .with_users(Ok(vec![user_row(2, 8)]))
        .with_subjects(Ok(math_subjects()));
    let page = page(backend, session.clone());
    let subscription = session.subscribe();
    let mut rx = page.watch();

    let drive = async {
        let _ = rx.wait_for(|state| state.loading).await;
        session.sign_in(AuthIdentity::from_email("user2@x.com"));
        let _ = rx.wait_for(|state| state.user.is_some()).await;
    };

    tokio::select! {
        () = page.run(subscription) => panic!("effect loop ended while the session was alive"),
        () = drive => {}
    }

    assert_eq!(page.state().user.map(|u| u.id), Some(2));
    assert_eq!(page.backend().user_lookups(), ["user1@x.com", "user2@x.com"]);
    assert_eq!(page.backend().content_lookups(), [8]);
}

#[tokio::test]
async fn run_returns_once_every_session_handle_is_gone() {
    let session = SessionContext::default();
    let subscription = session.subscribe();
    let page = page(FakeBackend::new(), SessionContext::default());
    drop(session);

    page.run(subscription).await;
    assert_eq!(page.backend().call_count(), 0);
}

#[tokio::test]
async fn blank_identity_mid_fetch_clears_instead_of_hanging() {
    let session = signed_in("user1@x.com");
    let (backend, _held) = FakeBackend::new().with_users_gated(Ok(vec![user_row(1, 7)]));
    let page = page(backend, session.clone());
    let subscription = session.subscribe();
    let mut rx = page.watch();

    let drive = async {
        let _ = rx.wait_for(|state| state.loading).await;
        session.sign_in(AuthIdentity::from_email("  "));
        let _ = rx.wait_for(|state| !state.loading).await;
    };

    tokio::select! {
        () = page.run(subscription) => panic!("effect loop ended while the session was alive"),
        () = drive => {}
    }

    let state = page.state();
    assert!(!state.loading);
    assert!(state.user.is_none());
    assert!(state.subjects_with_questions.is_empty());
    assert_eq!(page.backend().call_count(), 1);
    assert!(page.notifier().shown().is_empty());
}

#[tokio::test]
async fn blank_identity_after_load_clears_previous_account() {
    let session = signed_in("user1@x.com");
    let backend = FakeBackend::new()
        .with_users(Ok(vec![user_row(1, 7)]))
        .with_subjects(Ok(math_subjects()));
    let page = page(backend, session.clone());
    let subscription = session.subscribe();
    let mut rx = page.watch();

    let drive = async {
        let _ = rx.wait_for(|state| state.user.is_some()).await;
        session.sign_in(AuthIdentity::from_email(""));
        let _ = rx.wait_for(|state| state.user.is_none()).await;
    };

    tokio::select! {
        () = page.run(subscription) => panic!("effect loop ended while the session was alive"),
        () = drive => {}
    }

    assert!(!page.state().loading);
    assert_eq!(page.state().question_count(), 0);
    assert_eq!(page.backend().user_lookups(), ["user1@x.com"]);
}
