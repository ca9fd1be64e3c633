//! Wire DTOs for the subscription backend.
//!
//! Responses decode into these DTOs first and are then validated into
//! domain types in one pass.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ports::SubscribeRequest;
use crate::domain::{Publication, PublicationId, Subscription};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PublicationDto {
    #[serde(alias = "_id")]
    pub(super) id: String,
    pub(super) name: String,
    #[serde(default)]
    pub(super) language: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub(super) monthly_price: Decimal,
}

impl PublicationDto {
    pub(super) fn into_domain(self) -> Result<Publication, String> {
        let Self {
            id,
            name,
            language,
            monthly_price,
        } = self;
        let publication_id =
            PublicationId::new(id.as_str()).map_err(|err| format!("publication {id:?}: {err}"))?;
        Publication::try_new(publication_id, name, language, monthly_price)
            .map_err(|err| format!("publication {id:?}: {err}"))
    }
}

/// Publication reference as returned by the subscriptions endpoint.
///
/// Document-store backends return either the bare id or the populated
/// publication document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum PublicationRefDto {
    Id(String),
    Populated {
        #[serde(alias = "_id")]
        id: String,
    },
}

impl PublicationRefDto {
    fn into_id(self) -> String {
        match self {
            Self::Id(id) | Self::Populated { id } => id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubscriptionDto {
    pub(super) publication: PublicationRefDto,
    pub(super) customer_name: String,
}

impl SubscriptionDto {
    pub(super) fn into_domain(self) -> Result<Subscription, String> {
        let id = self.publication.into_id();
        let publication = PublicationId::new(id.as_str())
            .map_err(|err| format!("subscription for {:?}: {err}", self.customer_name))?;
        Ok(Subscription::new(publication, self.customer_name))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubscribeBodyDto<'a> {
    pub(super) customer_name: &'a str,
    pub(super) publication_id: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub(super) amount: Decimal,
}

impl<'a> From<&'a SubscribeRequest> for SubscribeBodyDto<'a> {
    fn from(request: &'a SubscribeRequest) -> Self {
        Self {
            customer_name: request.customer_name.as_str(),
            publication_id: request.publication_id.as_str(),
            amount: request.amount,
        }
    }
}

/// Error body; backends use either `message` or `error`.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBodyDto {
    pub(super) fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CustomerName;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::plain_id(json!({"id": "p1", "name": "Daily Times", "language": "en", "monthlyPrice": 100}))]
    #[case::document_id(json!({"_id": "p1", "name": "Daily Times", "language": "en", "monthlyPrice": 100.0}))]
    fn publications_accept_either_id_key(#[case] raw: serde_json::Value) {
        let dto: PublicationDto = serde_json::from_value(raw).expect("decode publication");
        let publication = dto.into_domain().expect("valid publication");

        assert_eq!(publication.id().as_str(), "p1");
        assert_eq!(publication.monthly_price(), Decimal::from(100));
    }

    #[rstest]
    fn publications_with_non_positive_prices_are_rejected() {
        let raw = json!({"id": "p1", "name": "Free Sheet", "monthlyPrice": 0});
        let dto: PublicationDto = serde_json::from_value(raw).expect("decode publication");

        let err = dto.into_domain().expect_err("zero price must fail");
        assert!(err.contains("monthly price must be positive"), "{err}");
    }

    #[rstest]
    #[case::bare(json!({"publication": "p1", "customerName": "Asha"}))]
    #[case::populated(json!({"publication": {"_id": "p1", "name": "Daily Times"}, "customerName": "Asha"}))]
    fn subscriptions_accept_bare_and_populated_references(#[case] raw: serde_json::Value) {
        let dto: SubscriptionDto = serde_json::from_value(raw).expect("decode subscription");
        let subscription = dto.into_domain().expect("valid subscription");

        assert_eq!(subscription.publication.as_str(), "p1");
        assert_eq!(subscription.customer_name, "Asha");
    }

    #[rstest]
    fn subscribe_body_uses_camel_case_and_numeric_amount() {
        let request = SubscribeRequest {
            customer_name: CustomerName::parse("Asha").expect("valid name"),
            publication_id: PublicationId::new("p1").expect("valid id"),
            amount: Decimal::new(1250, 2),
        };

        let body = serde_json::to_value(SubscribeBodyDto::from(&request)).expect("encode body");

        assert_eq!(
            body,
            json!({"customerName": "Asha", "publicationId": "p1", "amount": 12.5})
        );
    }

    #[rstest]
    #[case::message(json!({"message": "Already active"}), Some("Already active"))]
    #[case::error(json!({"error": "Already active"}), Some("Already active"))]
    #[case::blank(json!({"message": "  "}), None)]
    #[case::neither(json!({"status": 409}), None)]
    fn error_bodies_yield_the_server_message(
        #[case] raw: serde_json::Value,
        #[case] expected: Option<&str>,
    ) {
        let dto: ErrorBodyDto = serde_json::from_value(raw).expect("decode error body");
        assert_eq!(dto.into_message().as_deref(), expected);
    }
}
