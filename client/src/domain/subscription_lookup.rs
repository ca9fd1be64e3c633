//! Customer-name lookup of existing subscriptions.
//!
//! Lookups run on every edit of the name field, so several may be in flight
//! at once. Each call to [`SubscriptionLookup::issue`] takes a new
//! generation and only the response for the newest generation is applied.
//! Older responses, successful or not, are dropped without side effects.
//!
//! Issuing and resolving are separate steps so that a view can issue a
//! ticket synchronously on input and resolve it later on its own schedule.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::ports::SubscriptionGateway;
use super::{Feedback, PublicationId, SignupError, Subscription, is_subscribed};

/// Notification text shown when a lookup fails.
pub const LOOKUP_FAILED: &str = "Failed to fetch subscriptions";

/// Work item produced by [`SubscriptionLookup::issue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupTicket {
    /// The name was blank; the subscribed set has already been cleared.
    Cleared,
    /// A fetch must be performed for `customer_name`.
    Fetch {
        /// Generation the result must match to be applied.
        generation: u64,
        /// Name exactly as typed, untrimmed.
        customer_name: String,
    },
}

/// What happened to a resolved ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// No fetch was needed; the set is empty.
    Cleared,
    /// The fetched set replaced the previous one.
    Applied {
        /// Number of subscriptions now held.
        count: usize,
    },
    /// A newer lookup superseded this one.
    Discarded,
    /// The fetch failed; the previous set is kept.
    Failed,
}

#[derive(Debug, Default)]
struct LookupState {
    generation: u64,
    subscriptions: Vec<Subscription>,
}

/// Tracks the subscribed set for the name currently being typed.
pub struct SubscriptionLookup<G> {
    gateway: Arc<G>,
    feedback: Feedback,
    state: Mutex<LookupState>,
}

impl<G> SubscriptionLookup<G>
where
    G: SubscriptionGateway,
{
    /// Create a lookup with an empty subscribed set.
    #[must_use]
    pub fn new(gateway: Arc<G>, feedback: Feedback) -> Self {
        Self {
            gateway,
            feedback,
            state: Mutex::new(LookupState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, LookupState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a lookup for `customer_name`.
    ///
    /// A name that is blank once trimmed clears the subscribed set before
    /// returning and needs no fetch. Either way, every earlier ticket becomes
    /// stale.
    #[must_use]
    pub fn issue(&self, customer_name: &str) -> LookupTicket {
        let mut state = self.state();
        state.generation += 1;
        if customer_name.trim().is_empty() {
            state.subscriptions.clear();
            debug!(generation = state.generation, "cleared subscribed set");
            return LookupTicket::Cleared;
        }
        debug!(generation = state.generation, "issued subscription lookup");
        LookupTicket::Fetch {
            generation: state.generation,
            customer_name: customer_name.to_owned(),
        }
    }

    /// Perform the fetch for `ticket` and apply it if it is still current.
    pub async fn resolve(&self, ticket: LookupTicket) -> LookupOutcome {
        let LookupTicket::Fetch {
            generation,
            customer_name,
        } = ticket
        else {
            return LookupOutcome::Cleared;
        };

        let result = self.gateway.fetch_subscriptions(&customer_name).await;

        let mut state = self.state();
        if state.generation != generation {
            debug!(
                generation,
                latest = state.generation,
                "discarded stale subscription lookup"
            );
            return LookupOutcome::Discarded;
        }
        match result {
            Ok(subscriptions) => {
                let count = subscriptions.len();
                state.subscriptions = subscriptions;
                LookupOutcome::Applied { count }
            }
            Err(err) => {
                drop(state);
                self.feedback.report(&SignupError::from(err), LOOKUP_FAILED);
                LookupOutcome::Failed
            }
        }
    }

    /// Issue and resolve a lookup in one step.
    pub async fn refresh(&self, customer_name: &str) -> LookupOutcome {
        let ticket = self.issue(customer_name);
        self.resolve(ticket).await
    }

    /// Snapshot of the current subscribed set.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.state().subscriptions.clone()
    }

    /// Whether `publication` is in the current subscribed set.
    #[must_use]
    pub fn is_subscribed(&self, publication: &PublicationId) -> bool {
        is_subscribed(publication, &self.state().subscriptions)
    }
}
