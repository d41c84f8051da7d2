//! The question page controller.
//!
//! Owns the view state (published through a `watch` channel so renderers
//! re-render on every change), runs the identity → content fetch chain, and
//! reacts to session changes.
//!
//! Every chain takes a generation number when it starts. Only the chain that
//! is still the latest when it finishes may commit content, clear the loading
//! flag, or notify; anything older is discarded.

use std::sync::atomic::{AtomicU64, Ordering};

use qb_auth::{SessionContext, SessionSubscription};
use qb_backend::Backend;
use qb_core::enums::LayoutType;
use qb_core::identity::AuthIdentity;
use tokio::sync::watch;

use crate::error::PageError;
use crate::fetch::run_chain;
use crate::notify::{Notification, Notifier};
use crate::state::ViewState;

/// Result of one [`QuestionPage::refetch`].
#[derive(Debug)]
pub enum FetchOutcome {
    /// No signed-in identity; no read was issued.
    NoSession,
    /// Content replaced.
    Committed { subjects: usize, questions: usize },
    /// The chain failed; state was left as it was and one notification shown.
    Failed(PageError),
    /// A newer chain started before this one finished; its result was dropped.
    Superseded,
}

pub struct QuestionPage<B, N> {
    backend: B,
    notifier: N,
    session: SessionContext,
    state: watch::Sender<ViewState>,
    generation: AtomicU64,
}

impl<B: Backend, N: Notifier> QuestionPage<B, N> {
    pub fn new(backend: B, notifier: N, session: SessionContext, layout: LayoutType) -> Self {
        let (state, _rx) = watch::channel(ViewState::with_layout(layout));
        Self {
            backend,
            notifier,
            session,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current view state.
    #[must_use]
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver that wakes on every view state change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn toggle_layout(&self) {
        self.state.send_modify(ViewState::toggle_layout);
    }

    /// Open a question. Returns `false` (and changes nothing) if it is not
    /// loaded or a fetch is running.
    pub fn select_question(&self, question_id: i64) -> bool {
        self.state.send_if_modified(|state| state.select(question_id))
    }

    pub fn back(&self) {
        self.state.send_if_modified(|state| {
            let had_selection = state.selected.is_some();
            state.back();
            had_selection
        });
    }

    /// Run the fetch chain for the current session identity.
    ///
    /// With no usable identity nothing is read and the state is untouched.
    pub async fn refetch(&self) -> FetchOutcome {
        let Some(identity) = self.session.current() else {
            tracing::debug!("no session; skipping fetch");
            return FetchOutcome::NoSession;
        };
        let Some(email) = identity.usable_email() else {
            tracing::debug!("session has no email; skipping fetch");
            return FetchOutcome::NoSession;
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| state.loading = true);
        tracing::debug!(generation, email, "fetch chain started");

        let result = run_chain(&self.backend, email, identity.access_token.as_deref()).await;

        let mut outcome = FetchOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if !self.is_latest(generation) {
                return false;
            }
            state.loading = false;
            outcome = match result {
                Ok((user, subjects)) => {
                    let subject_count = subjects.len();
                    state.commit(user, subjects);
                    FetchOutcome::Committed {
                        subjects: subject_count,
                        questions: state.question_count(),
                    }
                }
                Err(error) => FetchOutcome::Failed(error),
            };
            true
        });

        match &outcome {
            FetchOutcome::Committed {
                subjects,
                questions,
            } => {
                tracing::debug!(generation, subjects, questions, "fetch chain committed");
            }
            FetchOutcome::Failed(error) => {
                tracing::warn!(generation, %error, "questions page fetch error");
                self.notifier.show(Notification::error(error.user_message()));
            }
            FetchOutcome::Superseded => {
                tracing::debug!(generation, "fetch chain superseded; result discarded");
            }
            FetchOutcome::NoSession => {}
        }
        outcome
    }

    /// Drop account-bound content and invalidate any running chain.
    pub fn clear_session_state(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(ViewState::clear_account);
    }

    /// React to the session for as long as the subscription lives.
    ///
    /// Fetches once for the identity current at subscription time (mount),
    /// then again on every identity change. A change that arrives while a
    /// chain is running abandons that chain. Signing out (or switching to an
    /// identity without a usable email) clears the content.
    /// Returns when every [`SessionContext`] handle is gone.
    pub async fn run(&self, mut subscription: SessionSubscription) {
        let mut identity = subscription.current();
        loop {
            let interrupted = {
                let signed_in = identity
                    .as_ref()
                    .and_then(AuthIdentity::usable_email)
                    .is_some();
                let effect = self.apply_identity(signed_in);
                tokio::pin!(effect);
                tokio::select! {
                    () = &mut effect => None,
                    next = subscription.changed() => Some(next),
                }
            };
            if interrupted.is_some() {
                tracing::debug!("session changed mid-fetch; abandoning chain");
            }
            let next = match interrupted {
                Some(next) => next,
                None => subscription.changed().await,
            };
            match next {
                Some(changed) => identity = changed,
                None => break,
            }
        }
        tracing::debug!("session context closed; page effect loop stopped");
    }

    async fn apply_identity(&self, signed_in: bool) {
        if signed_in {
            self.refetch().await;
        } else {
            self.clear_session_state();
        }
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

#[cfg(test)]
mod tests;
