//! Notification surface.

use std::sync::{Mutex, PoisonError};

use qb_core::enums::{NotificationIcon, Severity};
use serde::Serialize;

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub icon: NotificationIcon,
}

impl Notification {
    /// The error toast the page shows when a fetch chain fails.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error!".to_string(),
            message: message.into(),
            severity: Severity::Error,
            icon: NotificationIcon::X,
        }
    }

    /// A neutral hint, e.g. for input the page cannot act on.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            title: "Note".to_string(),
            message: message.into(),
            severity: Severity::Info,
            icon: NotificationIcon::Info,
        }
    }
}

/// Accepts notifications for display.
pub trait Notifier: Send + Sync {
    fn show(&self, notification: Notification);
}

/// Keeps every notification in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shown(&self) -> Vec<Notification> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.shown.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, notification: Notification) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
