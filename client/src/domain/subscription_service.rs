//! Submission of new subscriptions and their ledger projection.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use super::ports::{LedgerStore, SubscribeRequest, SubscriptionGateway};
use super::{
    CustomerName, LedgerCache, LedgerCacheError, PaymentRecord, Publication, SignupError,
    ValidationError,
};

/// Outcome of writing the payment record for a confirmed subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerWrite {
    /// The record was appended.
    Appended {
        /// Ledger length after the append.
        ledger_len: usize,
    },
    /// The backend accepted the subscription but the local write failed.
    ///
    /// The subscription stands; nothing is rolled back or retried.
    Failed(LedgerCacheError),
}

/// Result of a subscription the backend accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionReceipt {
    /// Record derived from the confirmation.
    pub record: PaymentRecord,
    /// What happened when the record was written locally.
    pub ledger: LedgerWrite,
}

/// Submits subscriptions and appends a payment record on success.
pub struct SubscriptionService<G, S> {
    gateway: Arc<G>,
    ledger: Arc<LedgerCache<S>>,
    clock: Arc<dyn Clock>,
}

impl<G, S> SubscriptionService<G, S>
where
    G: SubscriptionGateway,
    S: LedgerStore,
{
    /// Create a service over the gateway, ledger, and clock.
    #[must_use]
    pub const fn new(
        gateway: Arc<G>,
        ledger: Arc<LedgerCache<S>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            ledger,
            clock,
        }
    }

    /// Subscribe `customer_name` to the `selected` publication.
    ///
    /// Preconditions are checked before anything leaves the process. The
    /// ledger is only touched after the backend confirms the subscription,
    /// so a rejected request never produces a payment record.
    ///
    /// # Errors
    ///
    /// Returns [`SignupError::Validation`] when no publication is given or
    /// the name is blank, and the mapped gateway error when the backend
    /// refuses or cannot be reached. A local ledger failure after backend
    /// success is not an error; it is reported through
    /// [`LedgerWrite::Failed`].
    pub async fn subscribe(
        &self,
        selected: Option<&Publication>,
        customer_name: &str,
    ) -> Result<SubscriptionReceipt, SignupError> {
        let publication = selected.ok_or(ValidationError::NoPublicationSelected)?;
        let customer =
            CustomerName::parse(customer_name).ok_or(ValidationError::EmptyCustomerName)?;

        let request = SubscribeRequest::for_publication(customer, publication);
        self.gateway.subscribe(&request).await?;

        let record = PaymentRecord::for_confirmed_subscription(publication, self.clock.utc());
        info!(
            publication = %publication.id(),
            record_id = %record.id,
            "subscription confirmed"
        );

        let ledger = match self.ledger.append(record.clone()) {
            Ok(ledger_len) => LedgerWrite::Appended { ledger_len },
            Err(err) => {
                warn!(error = %err, record_id = %record.id, "payment record not cached");
                LedgerWrite::Failed(err)
            }
        };
        Ok(SubscriptionReceipt { record, ledger })
    }
}
