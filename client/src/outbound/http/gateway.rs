//! Reqwest-backed subscription gateway.
//!
//! This adapter owns transport details only: endpoint construction, bearer
//! credentials, timeout and HTTP status mapping, and JSON decoding into
//! domain types.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::dto::{ErrorBodyDto, PublicationDto, SubscribeBodyDto, SubscriptionDto};
use crate::domain::ports::{GatewayError, SubscribeRequest, SubscriptionGateway};
use crate::domain::{Publication, Subscription};

const PUBLICATIONS_PATH: [&str; 2] = ["customer", "publications"];
const SUBSCRIPTIONS_PATH: [&str; 2] = ["customer", "subscriptions"];
const SUBSCRIBE_PATH: [&str; 3] = ["customer", "subscriptions", "subscribe"];

/// Gateway adapter that talks JSON over HTTP to the subscription backend.
pub struct HttpSubscriptionGateway {
    client: Client,
    base_url: Url,
    token: Option<Zeroizing<String>>,
}

impl HttpSubscriptionGateway {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// `base_url` is the API root; endpoint paths are appended to it.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        token: Option<Zeroizing<String>>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        endpoint(&self.base_url, segments)
    }

    fn authorised(&self, builder: RequestBuilder) -> RequestBuilder {
        let Some(token) = &self.token else {
            return builder;
        };
        builder.bearer_auth(token.as_str())
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Vec<u8>, GatewayError> {
        let response = self
            .authorised(builder)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl SubscriptionGateway for HttpSubscriptionGateway {
    async fn fetch_publications(&self) -> Result<Vec<Publication>, GatewayError> {
        let url = self.endpoint(&PUBLICATIONS_PATH)?;
        let body = self.send(self.client.get(url)).await?;
        parse_publications(&body)
    }

    async fn fetch_subscriptions(
        &self,
        customer_name: &str,
    ) -> Result<Vec<Subscription>, GatewayError> {
        let mut url = self.endpoint(&SUBSCRIPTIONS_PATH)?;
        url.query_pairs_mut()
            .append_pair("customerName", customer_name);
        let body = self.send(self.client.get(url)).await?;
        parse_subscriptions(&body)
    }

    async fn subscribe(&self, request: &SubscribeRequest) -> Result<(), GatewayError> {
        let url = self.endpoint(&SUBSCRIBE_PATH)?;
        let payload = SubscribeBodyDto::from(request);
        self.send(self.client.post(url).json(&payload)).await?;
        debug!(publication = %request.publication_id, "subscribe request accepted");
        Ok(())
    }
}

fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url, GatewayError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| {
            GatewayError::invalid_request(format!("base URL {base_url} cannot carry a path"))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T, GatewayError> {
    serde_json::from_slice(body)
        .map_err(|error| GatewayError::decode(format!("invalid {what} payload: {error}")))
}

/// Invalid catalogue entries are logged and skipped so the rest of the
/// catalogue still shows in server order.
fn parse_publications(body: &[u8]) -> Result<Vec<Publication>, GatewayError> {
    let publications = decode::<Vec<PublicationDto>>(body, "publications")?
        .into_iter()
        .filter_map(|dto| {
            dto.into_domain()
                .inspect_err(|reason| warn!(%reason, "skipping invalid publication"))
                .ok()
        })
        .collect();
    Ok(publications)
}

/// A single bad entry fails the whole lookup, which keeps the previous
/// subscribed set instead of dropping a held subscription from the guard.

fn parse_subscriptions(body: &[u8]) -> Result<Vec<Subscription>, GatewayError> {
    decode::<Vec<SubscriptionDto>>(body, "subscriptions")?
        .into_iter()
        .map(SubscriptionDto::into_domain)
        .collect::<Result<_, _>>()
        .map_err(GatewayError::decode)
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::timeout(error.to_string())
    } else {
        GatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let server_message = serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()
        .and_then(ErrorBodyDto::into_message);

    match status {
        StatusCode::UNAUTHORIZED => GatewayError::unauthorized(
            server_message.unwrap_or_else(|| format!("status {}", status.as_u16())),
        ),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GatewayError::timeout(format!("status {}: {}", status.as_u16(), body_preview(body)))
        }
        _ => GatewayError::rejected(status.as_u16(), server_message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
