//! User-facing notifications and failure reporting.

use std::sync::Arc;

use tracing::warn;

use super::SignupError;
use super::ports::{Navigator, Notifier, Route};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    /// The requested action completed.
    Success,
    /// The action completed with a caveat the user should know about.
    Warning,
    /// The action failed.
    Error,
}

/// Transient, dismissible message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notification {
    /// Build a notification with an explicit level.
    #[must_use]
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    /// Warning notification.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    /// Error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

/// Notifier and navigator pair used to surface outcomes to the user.
#[derive(Clone)]
pub struct Feedback {
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl Feedback {
    /// Bundle the two view-layer ports.
    #[must_use]
    pub const fn new(notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            notifier,
            navigator,
        }
    }

    /// Show a notification.
    pub fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Move the user to `route`.
    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }

    /// Surface `error` to the user.
    ///
    /// Unauthorized sessions are redirected to the login view before the
    /// error notification is shown.
    pub fn report(&self, error: &SignupError, fallback: &str) {
        warn!(error = %error, fallback, "signup operation failed");
        if error.requires_login() {
            self.navigate(Route::Login);
        }
        self.notify(Notification::error(error.user_message(fallback)));
    }
}
