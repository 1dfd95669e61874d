//! Notifier that records instead of displaying.

use crate::notification::{Notification, NotificationLevel, Notifier};
use std::sync::{Arc, Mutex, PoisonError};

/// Collects every notification for later assertions
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything notified so far, in order
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages of one level, in order
    #[must_use]
    pub fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }

    /// Error messages, in order
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.messages(NotificationLevel::Error)
    }

    /// Forget everything recorded
    pub fn clear(&self) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
