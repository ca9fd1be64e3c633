//! Domain types and services for the subscription signup flow.
//!
//! Purpose: define strongly typed catalogue, subscription, and payment
//! entities together with the services that reconcile server-side
//! subscriptions against the locally cached payments ledger. Everything here
//! is transport agnostic; I/O is reached only through [`ports`].

pub mod ports;

mod catalog_loader;
mod dedup;
mod error;
mod ledger;
mod notification;
mod payment_record;
mod publication;
mod signup_flow;
mod subscription;
mod subscription_lookup;
mod subscription_service;

pub use self::catalog_loader::{CATALOG_LOAD_FAILED, CatalogLoader};
pub use self::dedup::{ALREADY_SUBSCRIBED_LABEL, SUBSCRIBE_LABEL, SubscribeControl, is_subscribed};
pub use self::error::{SignupError, ValidationError};
pub use self::ledger::{LEDGER_STORAGE_KEY, LedgerCache, LedgerCacheError, LedgerChanged};
pub use self::notification::{Feedback, Notification, NotificationLevel};
pub use self::payment_record::{
    PAYMENT_DUE_PERIOD_DAYS, PaymentRecord, PaymentRecordId, PaymentStatus,
};
pub use self::publication::{Publication, PublicationId, PublicationValidationError};
pub use self::signup_flow::{
    NO_PUBLICATIONS, SUBMITTING_LABEL, SUBSCRIBE_FAILED, SignupFlow, SignupFlowPorts, SubmitPhase,
};
pub use self::subscription::{CustomerName, Subscription};
pub use self::subscription_lookup::{
    LOOKUP_FAILED, LookupOutcome, LookupTicket, SubscriptionLookup,
};
pub use self::subscription_service::{LedgerWrite, SubscriptionReceipt, SubscriptionService};
