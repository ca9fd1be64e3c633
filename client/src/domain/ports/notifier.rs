//! Driven port for transient user-facing notifications.

use crate::domain::Notification;

/// Sink for toast-style notifications.
///
/// Delivery is fire-and-forget; implementations must not block the caller.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Show `notification` to the user.
    fn notify(&self, notification: Notification);
}

/// Fixture notifier that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotifier;

impl Notifier for FixtureNotifier {
    fn notify(&self, _notification: Notification) {}
}
