//! View-layer ports rendered to a terminal.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

use crate::domain::ports::{Navigator, Notifier, Route};
use crate::domain::{Notification, NotificationLevel};

/// Prefix shown before a notification of `level`.
#[must_use]
pub const fn level_tag(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Warning => "warning",
        NotificationLevel::Error => "error",
    }
}

/// Notifier that writes one line per notification.
pub struct TerminalNotifier<W> {
    out: Mutex<W>,
}

impl<W> TerminalNotifier<W> {
    /// Write notifications to `out`.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TerminalNotifier<io::Stderr> {
    /// Notifier writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W> Notifier for TerminalNotifier<W>
where
    W: Write + Send,
{
    fn notify(&self, notification: Notification) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let tag = level_tag(notification.level);
        if let Err(error) = writeln!(out, "[{tag}] {}", notification.message) {
            warn!(%error, "failed to write notification");
        }
    }
}

/// Navigator that records the most recent route for the command loop.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    current: Mutex<Option<Route>>,
}

impl TerminalNavigator {
    /// Route most recently navigated to.
    #[must_use]
    pub fn current(&self) -> Option<Route> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        info!(route = %route, "navigating");
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }
}
