//! Non-blocking user notifications (toasts)

use std::fmt;
use std::sync::Arc;
use ticketdock_core::{effect::Effect, fire_and_forget};

/// Severity of a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    /// Something worked
    Success,
    /// Informational
    Info,
    /// Something failed or input was rejected
    Error,
}

/// A message for the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,
    /// Text shown to the user
    pub message: String,
}

impl Notification {
    /// Success toast
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// Info toast
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    /// Error toast
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Delivers notifications to the user
///
/// Reducers never call this directly; they return a fire-and-forget effect
/// that does.
pub trait Notifier: Send + Sync {
    /// Show a notification
    fn notify(&self, notification: Notification);
}

/// Notifier that writes to the log, for headless use
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::warn!(message = %notification.message, "notification"),
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(message = %notification.message, "notification");
            },
        }
    }
}

/// Effect that shows `notifications` and feeds nothing back
pub fn notify<A: Send + 'static>(
    notifier: &Arc<dyn Notifier>,
    notifications: impl IntoIterator<Item = Notification>,
) -> Effect<A> {
    let notifier = Arc::clone(notifier);
    let notifications: Vec<Notification> = notifications.into_iter().collect();
    fire_and_forget! {
        for notification in notifications {
            notifier.notify(notification);
        }
    }
}
