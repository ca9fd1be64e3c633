//! Driven port for moving the user between views.

use std::fmt;

/// Views the signup flow can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The payments view, shown after a confirmed subscription.
    Payments,
    /// The login view, shown when the backend rejects credentials.
    Login,
}

impl Route {
    /// Path of the view within the customer application.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Payments => "/customer/payments",
            Self::Login => "/login",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation sink.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Move the user to `route`.
    fn navigate(&self, route: Route);
}

/// Fixture navigator that stays put.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNavigator;

impl Navigator for FixtureNavigator {
    fn navigate(&self, _route: Route) {}
}
