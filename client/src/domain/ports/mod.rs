//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod ledger_store;
mod navigator;
mod notifier;
mod subscription_gateway;

#[cfg(test)]
pub use ledger_store::MockLedgerStore;
pub use ledger_store::{FixtureLedgerStore, LedgerStore, LedgerStoreError};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::{FixtureNavigator, Navigator, Route};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{FixtureNotifier, Notifier};
#[cfg(test)]
pub use subscription_gateway::MockSubscriptionGateway;
pub use subscription_gateway::{
    FixtureSubscriptionGateway, GatewayError, SubscribeRequest, SubscriptionGateway,
};
