//! Page controller for the subscription signup view.
//!
//! `SignupFlow` owns the view state (catalogue, selection dialog, name field,
//! submit phase) and sequences the catalogue loader, the subscription lookup,
//! and the subscription service. Its state lock is never held across an
//! await point.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mockable::Clock;
use tracing::debug;

use super::ports::{LedgerStore, Navigator, Notifier, Route, SubscriptionGateway};
use super::{
    CatalogLoader, Feedback, LedgerCache, LedgerWrite, LookupOutcome, Notification, Publication,
    PublicationId, SignupError, SubscribeControl, Subscription, SubscriptionLookup,
    SubscriptionReceipt, SubscriptionService, ValidationError,
};

/// Notification text shown when a subscribe attempt fails without a server
/// message.
pub const SUBSCRIBE_FAILED: &str = "Failed to subscribe";
/// Empty-state text shown when the catalogue is empty.
pub const NO_PUBLICATIONS: &str = "No publications available";
/// Label shown on the selected publication's control while submitting.
pub const SUBMITTING_LABEL: &str = "Subscribing...";

/// Phase of the current subscribe attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    /// Ready to submit.
    #[default]
    Idle,
    /// Awaiting the backend.
    Submitting,
    /// The backend accepted the subscription.
    Committed,
}

/// Collaborators required to assemble a [`SignupFlow`].
pub struct SignupFlowPorts<G, S> {
    /// Remote backend.
    pub gateway: Arc<G>,
    /// Local payments ledger.
    pub ledger: Arc<LedgerCache<S>>,
    /// Time source for payment records.
    pub clock: Arc<dyn Clock>,
    /// Toast sink.
    pub notifier: Arc<dyn Notifier>,
    /// View router.
    pub navigator: Arc<dyn Navigator>,
}

#[derive(Debug, Default)]
struct FlowState {
    publications: Vec<Publication>,
    selected: Option<PublicationId>,
    dialog_open: bool,
    customer_name: String,
    phase: SubmitPhase,
}

impl FlowState {
    fn selected_publication(&self) -> Option<&Publication> {
        let selected = self.selected.as_ref()?;
        self.publications.iter().find(|p| p.id() == selected)
    }
}

/// Signup view controller.
pub struct SignupFlow<G, S> {
    catalog: CatalogLoader<G>,
    lookup: SubscriptionLookup<G>,
    service: SubscriptionService<G, S>,
    feedback: Feedback,
    state: Mutex<FlowState>,
}

impl<G, S> SignupFlow<G, S>
where
    G: SubscriptionGateway,
    S: LedgerStore,
{
    /// Assemble a flow from its ports.
    #[must_use]
    pub fn new(ports: SignupFlowPorts<G, S>) -> Self {
        let SignupFlowPorts {
            gateway,
            ledger,
            clock,
            notifier,
            navigator,
        } = ports;
        let feedback = Feedback::new(notifier, navigator);
        Self {
            catalog: CatalogLoader::new(Arc::clone(&gateway), feedback.clone()),
            lookup: SubscriptionLookup::new(Arc::clone(&gateway), feedback.clone()),
            service: SubscriptionService::new(gateway, ledger, clock),
            feedback,
            state: Mutex::new(FlowState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, FlowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the catalogue for a fresh view activation.
    ///
    /// Returns the number of publications now listed.
    pub async fn activate(&self) -> usize {
        let publications = self.catalog.load().await;
        let count = publications.len();
        let mut state = self.state();
        state.publications = publications;
        state.selected = None;
        state.dialog_open = false;
        count
    }

    /// Publications in catalogue order.
    #[must_use]
    pub fn publications(&self) -> Vec<Publication> {
        self.state().publications.clone()
    }

    /// Empty-state text to show instead of the catalogue, if any.
    #[must_use]
    pub fn empty_state(&self) -> Option<&'static str> {
        self.state()
            .publications
            .is_empty()
            .then_some(NO_PUBLICATIONS)
    }

    /// Open the selection dialog for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownPublication`] when `id` is not in
    /// the loaded catalogue and [`ValidationError::SubmissionInProgress`]
    /// while a subscribe request is outstanding.
    pub fn select_publication(&self, id: &PublicationId) -> Result<(), SignupError> {
        let mut state = self.state();
        if state.phase == SubmitPhase::Submitting {
            return Err(ValidationError::SubmissionInProgress.into());
        }
        if !state.publications.iter().any(|p| p.id() == id) {
            return Err(ValidationError::UnknownPublication { id: id.to_string() }.into());
        }
        state.selected = Some(id.clone());
        state.dialog_open = true;
        state.phase = SubmitPhase::Idle;
        Ok(())
    }

    /// Currently selected publication.
    #[must_use]
    pub fn selected_publication(&self) -> Option<Publication> {
        self.state().selected_publication().cloned()
    }

    /// Dismiss the selection dialog.
    pub fn close_dialog(&self) {
        let mut state = self.state();
        state.dialog_open = false;
        state.selected = None;
    }

    /// Whether the selection dialog is showing.
    #[must_use]
    pub fn dialog_open(&self) -> bool {
        self.state().dialog_open
    }

    /// Phase of the current subscribe attempt.
    #[must_use]
    pub fn phase(&self) -> SubmitPhase {
        self.state().phase
    }

    /// Name field contents as typed.
    #[must_use]
    pub fn customer_name(&self) -> String {
        self.state().customer_name.clone()
    }

    /// Record an edit of the name field and refresh the subscribed set.
    pub async fn set_customer_name(&self, customer_name: &str) -> LookupOutcome {
        self.state().customer_name = customer_name.to_owned();
        self.lookup.refresh(customer_name).await
    }

    /// Subscriptions held by the customer named in the field.
    #[must_use]
    pub fn subscribed_set(&self) -> Vec<Subscription> {
        self.lookup.subscriptions()
    }

    /// Lookup driving the subscribed set.
    #[must_use]
    pub fn lookup(&self) -> &SubscriptionLookup<G> {
        &self.lookup
    }

    /// Subscribe control state for `id`.
    #[must_use]
    pub fn subscribe_control(&self, id: &PublicationId) -> SubscribeControl {
        let submitting = {
            let state = self.state();
            state.phase == SubmitPhase::Submitting && state.selected.as_ref() == Some(id)
        };
        if submitting {
            return SubscribeControl {
                enabled: false,
                label: SUBMITTING_LABEL,
            };
        }
        SubscribeControl::for_publication(id, &self.lookup.subscriptions())
    }

    /// Confirm the subscription shown in the dialog.
    ///
    /// On success the dialog closes, the subscribed set is refreshed, and the
    /// user is sent to the payments view. On failure the dialog stays open
    /// and the flow returns to [`SubmitPhase::Idle`].
    ///
    /// # Errors
    ///
    /// Returns the [`SignupError`] that was reported to the user.
    pub async fn confirm_subscription(&self) -> Result<SubscriptionReceipt, SignupError> {
        let (publication, customer_name) = match self.begin_submission() {
            Ok(attempt) => attempt,
            Err(err) => {
                self.feedback.report(&err, SUBSCRIBE_FAILED);
                return Err(err);
            }
        };

        let result = self
            .service
            .subscribe(publication.as_ref(), &customer_name)
            .await;

        match result {
            Ok(receipt) => {
                self.commit(&receipt, &customer_name).await;
                Ok(receipt)
            }
            Err(err) => {
                self.state().phase = SubmitPhase::Idle;
                self.feedback.report(&err, SUBSCRIBE_FAILED);
                Err(err)
            }
        }
    }

    fn begin_submission(&self) -> Result<(Option<Publication>, String), SignupError> {
        let mut state = self.state();
        if state.phase == SubmitPhase::Submitting {
            return Err(ValidationError::SubmissionInProgress.into());
        }
        let publication = state.selected_publication().cloned();
        if let Some(selected) = &publication {
            if self.lookup.is_subscribed(selected.id()) {
                return Err(ValidationError::AlreadySubscribed {
                    publication_name: selected.name().to_owned(),
                }
                .into());
            }
        }
        state.phase = SubmitPhase::Submitting;
        Ok((publication, state.customer_name.clone()))
    }

    async fn commit(&self, receipt: &SubscriptionReceipt, customer_name: &str) {
        {
            let mut state = self.state();
            state.phase = SubmitPhase::Committed;
            state.dialog_open = false;
            state.selected = None;
        }
        let outcome = self.lookup.refresh(customer_name).await;
        debug!(?outcome, "refreshed subscribed set after commit");
        self.feedback.navigate(Route::Payments);

        let name = &receipt.record.subscription_name;
        let notification = match &receipt.ledger {
            LedgerWrite::Appended { .. } => {
                Notification::success(format!("Successfully subscribed to {name}"))
            }
            LedgerWrite::Failed(_) => Notification::warning(format!(
                "Subscribed to {name}, but the payment record could not be saved locally"
            )),
        };
        self.feedback.notify(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationLevel;
    use crate::domain::ports::{
        FixtureLedgerStore, GatewayError, LedgerStoreError, SubscribeRequest,
    };
    use crate::outbound::storage::MemoryLedgerStore;
    use crate::test_support::{FixedClock, RecordingNavigator, RecordingNotifier, ScriptedGateway};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use tokio::sync::Semaphore;

    fn id(raw: &str) -> PublicationId {
        PublicationId::new(raw).expect("valid id")
    }

    fn daily() -> Publication {
        Publication::try_new(id("p1"), "Daily Times", "en", Decimal::from(100)).expect("valid")
    }

    struct Harness<G, S> {
        flow: SignupFlow<G, S>,
        ledger: Arc<LedgerCache<S>>,
        notifier: Arc<RecordingNotifier>,
        navigator: Arc<RecordingNavigator>,
    }

    fn harness<G, S>(gateway: Arc<G>, store: S) -> Harness<G, S>
    where
        G: SubscriptionGateway,
        S: LedgerStore,
    {
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let now = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid instant");
        let ledger = Arc::new(LedgerCache::new(Arc::new(store)));
        let flow = SignupFlow::new(SignupFlowPorts {
            gateway,
            ledger: Arc::clone(&ledger),
            clock: Arc::new(FixedClock::new(now)),
            notifier: Arc::clone(&notifier) as Arc<dyn Notifier>,
            navigator: Arc::clone(&navigator) as Arc<dyn Navigator>,
        });
        Harness {
            flow,
            ledger,
            notifier,
            navigator,
        }
    }

    /// Gateway whose subscribe call waits for a permit.
    struct GatedGateway {
        gate: Semaphore,
        inner: ScriptedGateway,
    }

    #[async_trait]
    impl SubscriptionGateway for GatedGateway {
        async fn fetch_publications(&self) -> Result<Vec<Publication>, GatewayError> {
            self.inner.fetch_publications().await
        }

        async fn fetch_subscriptions(
            &self,
            customer_name: &str,
        ) -> Result<Vec<Subscription>, GatewayError> {
            self.inner.fetch_subscriptions(customer_name).await
        }

        async fn subscribe(&self, request: &SubscribeRequest) -> Result<(), GatewayError> {
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|err| GatewayError::transport(err.to_string()))?;
            permit.forget();
            self.inner.subscribe(request).await
        }
    }

    #[tokio::test]
    async fn empty_catalogue_shows_the_empty_state() {
        let h = harness(Arc::new(ScriptedGateway::default()), FixtureLedgerStore);

        assert_eq!(h.flow.activate().await, 0);
        assert_eq!(h.flow.empty_state(), Some("No publications available"));
    }

    #[tokio::test]
    async fn unknown_publications_cannot_be_selected() {
        let gateway = Arc::new(ScriptedGateway::with_publications(vec![daily()]));
        let h = harness(gateway, FixtureLedgerStore);
        h.flow.activate().await;

        let err = h
            .flow
            .select_publication(&id("missing"))
            .expect_err("unknown id must be rejected");

        assert!(matches!(
            err,
            SignupError::Validation(ValidationError::UnknownPublication { .. })
        ));
        assert!(!h.flow.dialog_open());
    }

    #[tokio::test]
    async fn confirming_an_already_held_subscription_is_rejected_locally() {
        let gateway = Arc::new(ScriptedGateway::with_publications(vec![daily()]));
        gateway.add_subscription("Asha", id("p1"));
        let h = harness(Arc::clone(&gateway), MemoryLedgerStore::default());
        h.flow.activate().await;
        h.flow.set_customer_name("Asha").await;
        h.flow.select_publication(&id("p1")).expect("select");

        let err = h
            .flow
            .confirm_subscription()
            .await
            .expect_err("duplicate must be rejected");

        assert!(matches!(
            err,
            SignupError::Validation(ValidationError::AlreadySubscribed { .. })
        ));
        assert_eq!(gateway.subscribe_calls(), 0);
        assert_eq!(h.flow.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn second_confirm_while_submitting_is_rejected() {
        let gateway = Arc::new(GatedGateway {
            gate: Semaphore::new(0),
            inner: ScriptedGateway::with_publications(vec![daily()]),
        });
        let h = harness(Arc::clone(&gateway), MemoryLedgerStore::default());
        h.flow.activate().await;
        h.flow.set_customer_name("Asha").await;
        h.flow.select_publication(&id("p1")).expect("select");

        let (first, second) = tokio::join!(h.flow.confirm_subscription(), async {
            assert_eq!(h.flow.phase(), SubmitPhase::Submitting);
            let control = h.flow.subscribe_control(&id("p1"));
            assert_eq!(control.label, SUBMITTING_LABEL);
            let second = h.flow.confirm_subscription().await;
            gateway.gate.add_permits(1);
            second
        });

        assert!(first.is_ok());
        assert_eq!(
            second.expect_err("second confirm must be rejected"),
            SignupError::Validation(ValidationError::SubmissionInProgress)
        );
        assert_eq!(gateway.inner.subscribe_calls(), 1);
        assert_eq!(h.flow.phase(), SubmitPhase::Committed);
    }

    #[tokio::test]
    async fn failed_submission_returns_to_idle_and_can_be_retried() {
        let gateway = Arc::new(ScriptedGateway::with_publications(vec![daily()]));
        gateway.fail_subscribe(Some(GatewayError::rejected(
            409_u16,
            Some("Already active".to_owned()),
        )));
        let h = harness(Arc::clone(&gateway), MemoryLedgerStore::default());
        let mut changes = h.ledger.subscribe();
        h.flow.activate().await;
        h.flow.set_customer_name("Asha").await;
        h.flow.select_publication(&id("p1")).expect("select");

        h.flow
            .confirm_subscription()
            .await
            .expect_err("rejection must fail");

        assert_eq!(h.flow.phase(), SubmitPhase::Idle);
        assert!(h.flow.dialog_open());
        assert!(h.ledger.records().expect("read ledger").is_empty());
        assert_eq!(h.flow.subscribe_control(&id("p1")).label, "Subscribe");
        assert!(h.navigator.routes().is_empty());

        gateway.fail_subscribe(None);
        let receipt = h
            .flow
            .confirm_subscription()
            .await
            .expect("retry succeeds");

        assert_eq!(receipt.ledger, LedgerWrite::Appended { ledger_len: 1 });
        assert_eq!(h.flow.phase(), SubmitPhase::Committed);
        assert!(!h.flow.dialog_open());
        assert_eq!(h.ledger.records().expect("read ledger").len(), 1);
        assert!(changes.try_recv().is_ok());
        assert!(changes.try_recv().is_err());
        assert_eq!(gateway.subscribe_calls(), 2);
        assert_eq!(h.navigator.routes(), vec![Route::Payments]);
    }

    struct FullStore;

    impl LedgerStore for FullStore {
        fn read(&self, _key: &str) -> Result<Option<String>, LedgerStoreError> {
            Ok(None)
        }

        fn write(&self, key: &str, _value: &str) -> Result<(), LedgerStoreError> {
            Err(LedgerStoreError::write(key, "quota exceeded"))
        }

        fn remove(&self, _key: &str) -> Result<(), LedgerStoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn ledger_failure_after_confirmation_warns_and_still_navigates() {
        let gateway = Arc::new(ScriptedGateway::with_publications(vec![daily()]));
        let h = harness(gateway, FullStore);
        h.flow.activate().await;
        h.flow.set_customer_name("Asha").await;
        h.flow.select_publication(&id("p1")).expect("select");

        h.flow
            .confirm_subscription()
            .await
            .expect("backend success stands");

        let last = h.notifier.last().expect("a notification");
        assert_eq!(last.level, NotificationLevel::Warning);
        assert_eq!(h.navigator.routes(), vec![Route::Payments]);
        assert_eq!(h.flow.phase(), SubmitPhase::Committed);
    }
}
