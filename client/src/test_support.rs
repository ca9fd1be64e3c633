//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cfg(test)` and when the `test-support` feature is enabled.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{
    GatewayError, Navigator, Notifier, Route, SubscribeRequest, SubscriptionGateway,
};
use crate::domain::{Notification, Publication, PublicationId, Subscription};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock pinned to an instant until advanced.
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    /// Pin the clock at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward by `seconds`.
    pub fn advance_seconds(&self, seconds: i64) {
        *lock(&self.0) += TimeDelta::seconds(seconds);
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}

/// Notifier that keeps every notification it is given.
#[derive(Default)]
pub struct RecordingNotifier(Mutex<Vec<Notification>>);

impl RecordingNotifier {
    /// All notifications in delivery order.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.0).clone()
    }

    /// Messages of all notifications in delivery order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        lock(&self.0).iter().map(|n| n.message.clone()).collect()
    }

    /// Most recent notification.
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        lock(&self.0).last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        lock(&self.0).push(notification);
    }
}

/// Navigator that keeps every route it is sent to.
#[derive(Default)]
pub struct RecordingNavigator(Mutex<Vec<Route>>);

impl RecordingNavigator {
    /// Routes in navigation order.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        lock(&self.0).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        lock(&self.0).push(route);
    }
}

/// Call made against a [`ScriptedGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// Catalogue fetch.
    FetchPublications,
    /// Subscription lookup with the name as sent.
    FetchSubscriptions(String),
    /// Subscribe submission.
    Subscribe(SubscribeRequest),
}

#[derive(Default)]
struct Script {
    publications: Vec<Publication>,
    catalogue_failure: Option<GatewayError>,
    lookup_failure: Option<GatewayError>,
    subscribe_failure: Option<GatewayError>,
    held: HashMap<String, Vec<PublicationId>>,
    calls: Vec<GatewayCall>,
}

/// In-process backend with scripted failures.
///
/// Successful subscribe calls are recorded against the trimmed customer name
/// so that later lookups see them, as the real backend would.
#[derive(Default)]
pub struct ScriptedGateway(Mutex<Script>);

impl ScriptedGateway {
    /// Gateway serving `publications`.
    #[must_use]
    pub fn with_publications(publications: Vec<Publication>) -> Self {
        Self(Mutex::new(Script {
            publications,
            ..Script::default()
        }))
    }

    /// Append `publication` to the served catalogue.
    pub fn add_publication(&self, publication: Publication) {
        lock(&self.0).publications.push(publication);
    }

    /// Record an existing subscription for `customer_name`.
    pub fn add_subscription(&self, customer_name: &str, publication: PublicationId) {
        lock(&self.0)
            .held
            .entry(customer_name.to_owned())
            .or_default()
            .push(publication);
    }

    /// Fail catalogue fetches with `error` until reset with `None`.
    pub fn fail_catalogue(&self, error: Option<GatewayError>) {
        lock(&self.0).catalogue_failure = error;
    }

    /// Fail lookups with `error` until reset with `None`.
    pub fn fail_lookups(&self, error: Option<GatewayError>) {
        lock(&self.0).lookup_failure = error;
    }

    /// Fail subscribe calls with `error` until reset with `None`.
    pub fn fail_subscribe(&self, error: Option<GatewayError>) {
        lock(&self.0).subscribe_failure = error;
    }

    /// Every call received, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        lock(&self.0).calls.clone()
    }

    /// Number of lookups received.
    #[must_use]
    pub fn lookup_calls(&self) -> usize {
        lock(&self.0)
            .calls
            .iter()
            .filter(|call| matches!(call, GatewayCall::FetchSubscriptions(_)))
            .count()
    }

    /// Number of subscribe submissions received.
    #[must_use]
    pub fn subscribe_calls(&self) -> usize {
        lock(&self.0)
            .calls
            .iter()
            .filter(|call| matches!(call, GatewayCall::Subscribe(_)))
            .count()
    }
}

#[async_trait]
impl SubscriptionGateway for ScriptedGateway {
    async fn fetch_publications(&self) -> Result<Vec<Publication>, GatewayError> {
        let mut script = lock(&self.0);
        script.calls.push(GatewayCall::FetchPublications);
        if let Some(error) = &script.catalogue_failure {
            return Err(error.clone());
        }
        Ok(script.publications.clone())
    }

    async fn fetch_subscriptions(
        &self,
        customer_name: &str,
    ) -> Result<Vec<Subscription>, GatewayError> {
        let mut script = lock(&self.0);
        script
            .calls
            .push(GatewayCall::FetchSubscriptions(customer_name.to_owned()));
        if let Some(error) = &script.lookup_failure {
            return Err(error.clone());
        }
        let held = script.held.get(customer_name).cloned().unwrap_or_default();
        Ok(held
            .into_iter()
            .map(|publication| Subscription::new(publication, customer_name))
            .collect())
    }

    async fn subscribe(&self, request: &SubscribeRequest) -> Result<(), GatewayError> {
        let mut script = lock(&self.0);
        script.calls.push(GatewayCall::Subscribe(request.clone()));
        if let Some(error) = &script.subscribe_failure {
            return Err(error.clone());
        }
        script
            .held
            .entry(request.customer_name.as_str().to_owned())
            .or_default()
            .push(request.publication_id.clone());
        Ok(())
    }
}
