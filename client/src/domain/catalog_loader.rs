//! Publication catalogue fetch performed on view activation.

use std::sync::Arc;

use tracing::debug;

use super::ports::SubscriptionGateway;
use super::{Feedback, Publication, SignupError};

/// Notification text shown when the catalogue cannot be fetched.
pub const CATALOG_LOAD_FAILED: &str = "Failed to load publications";

/// Fetches the publication catalogue, failing open to an empty list.
pub struct CatalogLoader<G> {
    gateway: Arc<G>,
    feedback: Feedback,
}

impl<G> CatalogLoader<G>
where
    G: SubscriptionGateway,
{
    /// Create a loader over `gateway`.
    #[must_use]
    pub const fn new(gateway: Arc<G>, feedback: Feedback) -> Self {
        Self { gateway, feedback }
    }

    /// Fetch every publication in server order.
    ///
    /// Failures are reported to the user and yield an empty catalogue.
    pub async fn load(&self) -> Vec<Publication> {
        match self.gateway.fetch_publications().await {
            Ok(publications) => {
                debug!(count = publications.len(), "loaded publication catalogue");
                publications
            }
            Err(err) => {
                self.feedback
                    .report(&SignupError::from(err), CATALOG_LOAD_FAILED);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        FixtureNavigator, GatewayError, MockNotifier, MockSubscriptionGateway,
    };
    use crate::domain::{Notification, PublicationId};
    use mockall::predicate::eq;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn publication(raw_id: &str, name: &str) -> Publication {
        let id = PublicationId::new(raw_id).expect("valid id");
        Publication::try_new(id, name, "en", Decimal::from(10)).expect("valid publication")
    }

    fn silent_feedback() -> Feedback {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();
        Feedback::new(Arc::new(notifier), Arc::new(FixtureNavigator))
    }

    #[tokio::test]
    async fn keeps_server_order() {
        let mut gateway = MockSubscriptionGateway::new();
        gateway.expect_fetch_publications().times(1).returning(|| {
            Ok(vec![
                publication("p2", "Weekly Ledger"),
                publication("p1", "Daily Times"),
            ])
        });
        let loader = CatalogLoader::new(Arc::new(gateway), silent_feedback());

        let names: Vec<_> = loader
            .load()
            .await
            .iter()
            .map(|p| p.name().to_owned())
            .collect();

        assert_eq!(names, ["Weekly Ledger", "Daily Times"]);
    }

    #[rstest]
    #[case::transport(GatewayError::transport("connection refused"))]
    #[case::rejected(GatewayError::rejected(500_u16, None::<String>))]
    #[case::decode(GatewayError::decode("missing monthlyPrice"))]
    #[tokio::test]
    async fn failures_notify_and_yield_an_empty_catalogue(#[case] failure: GatewayError) {
        let mut gateway = MockSubscriptionGateway::new();
        gateway
            .expect_fetch_publications()
            .times(1)
            .returning(move || Err(failure.clone()));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .with(eq(Notification::error(CATALOG_LOAD_FAILED)))
            .times(1)
            .return_const(());
        let feedback = Feedback::new(Arc::new(notifier), Arc::new(FixtureNavigator));
        let loader = CatalogLoader::new(Arc::new(gateway), feedback);

        assert!(loader.load().await.is_empty());
    }
}
