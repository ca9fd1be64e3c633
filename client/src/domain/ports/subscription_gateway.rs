//! Driven port for the remote subscription backend.
//!
//! The domain owns the request shapes and the failure taxonomy; adapters own
//! transport, credentials, and wire decoding.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{CustomerName, Publication, PublicationId, Subscription};

use super::define_port_error;

/// Subscribe request submitted to the remote backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeRequest {
    /// Trimmed customer name.
    pub customer_name: CustomerName,
    /// Publication being subscribed to.
    pub publication_id: PublicationId,
    /// Amount charged, equal to the publication's monthly price.
    pub amount: Decimal,
}

impl SubscribeRequest {
    /// Build the request for subscribing `customer_name` to `publication`.
    #[must_use]
    pub fn for_publication(customer_name: CustomerName, publication: &Publication) -> Self {
        Self {
            customer_name,
            publication_id: publication.id().clone(),
            amount: publication.monthly_price(),
        }
    }
}

define_port_error! {
    /// Errors surfaced by remote gateway adapters.
    pub enum GatewayError {
        /// Network transport failed before a response arrived.
        Transport {
            /// Transport description of the failure.
            message: String,
        } => "subscription backend transport failed: {message}",
        /// The transport timed out.
        Timeout {
            /// Transport description of the timeout.
            message: String,
        } => "subscription backend timed out: {message}",
        /// Credentials were missing, expired, or rejected.
        Unauthorized {
            /// Server or transport explanation.
            message: String,
        } => "subscription backend rejected credentials: {message}",
        /// The backend answered with a failure status.
        Rejected {
            /// HTTP status returned.
            status: u16,
            /// Server-supplied explanation, when one was present.
            message: Option<String>,
        } => "subscription backend rejected request with status {status}",
        /// The response body could not be decoded into domain types.
        Decode {
            /// Decoder description of the problem.
            message: String,
        } => "subscription backend response decode failed: {message}",
        /// The adapter refused to build the request.
        InvalidRequest {
            /// Why the request could not be built.
            message: String,
        } => "subscription backend request invalid: {message}",
    }
}

impl GatewayError {
    /// Structured message supplied by the backend, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Port for the remote catalogue and subscription endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionGateway: Send + Sync {
    /// Fetch every subscribable publication, in server order.
    async fn fetch_publications(&self) -> Result<Vec<Publication>, GatewayError>;

    /// Fetch the subscriptions recorded for `customer_name`.
    ///
    /// The name is forwarded exactly as given; callers decide whether a name
    /// is worth looking up.
    async fn fetch_subscriptions(
        &self,
        customer_name: &str,
    ) -> Result<Vec<Subscription>, GatewayError>;

    /// Submit a subscribe request. Success carries no payload.
    async fn subscribe(&self, request: &SubscribeRequest) -> Result<(), GatewayError>;
}

/// Fixture gateway with an empty catalogue that accepts every subscription.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubscriptionGateway;

#[async_trait]
impl SubscriptionGateway for FixtureSubscriptionGateway {
    async fn fetch_publications(&self) -> Result<Vec<Publication>, GatewayError> {
        Ok(Vec::new())
    }

    async fn fetch_subscriptions(
        &self,
        _customer_name: &str,
    ) -> Result<Vec<Subscription>, GatewayError> {
        Ok(Vec::new())
    }

    async fn subscribe(&self, _request: &SubscribeRequest) -> Result<(), GatewayError> {
        Ok(())
    }
}
