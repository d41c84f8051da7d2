//! Process-wide session context.
//!
//! One [`SessionContext`] holds the current [`AuthIdentity`] (or none).
//! Consumers call [`SessionContext::subscribe`] to be told about sign-in,
//! sign-out, and account switches, and end that interest with
//! [`SessionSubscription::unsubscribe`] (or by dropping the subscription).

use std::sync::Arc;

use qb_core::identity::AuthIdentity;
use tokio::sync::watch;

/// Shared handle to the current session. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionContext {
    tx: Arc<watch::Sender<Option<AuthIdentity>>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionContext {
    #[must_use]
    pub fn new(initial: Option<AuthIdentity>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current identity.
    #[must_use]
    pub fn current(&self) -> Option<AuthIdentity> {
        self.tx.borrow().clone()
    }

    /// Replace the identity. Subscribers are woken only if it changed.
    pub fn sign_in(&self, identity: AuthIdentity) {
        let changed = self.tx.send_if_modified(|current| {
            if current.as_ref() == Some(&identity) {
                return false;
            }
            *current = Some(identity);
            true
        });
        if changed {
            tracing::debug!(subscribers = self.tx.receiver_count(), "session changed");
        }
    }

    /// Clear the identity. Subscribers are woken only if one was set.
    pub fn sign_out(&self) {
        if self.tx.send_if_modified(|current| current.take().is_some()) {
            tracing::debug!(subscribers = self.tx.receiver_count(), "session cleared");
        }
    }

    /// Start receiving identity changes. The current identity counts as
    /// already seen; read it with [`SessionSubscription::current`].
    #[must_use]
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A live interest in session changes.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: watch::Receiver<Option<AuthIdentity>>,
}

impl SessionSubscription {
    /// Read the current identity and mark it seen, so [`Self::changed`]
    /// only wakes for later changes.
    #[must_use]
    pub fn current(&mut self) -> Option<AuthIdentity> {
        self.rx.borrow_and_update().clone()
    }

    /// Wait for the next identity change.
    ///
    /// Returns `None` once every [`SessionContext`] handle has been dropped.
    /// Changes made while nobody was waiting collapse into the latest value.
    pub async fn changed(&mut self) -> Option<Option<AuthIdentity>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Stop receiving changes.
    pub fn unsubscribe(self) {
        drop(self);
    }
}
