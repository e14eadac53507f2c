use async_trait::async_trait;
use bigdecimal::{BigDecimal, RoundingMode};
use serde::Deserialize;
use url::Url;

use feecap_types::ChainProfile;

use crate::{PriceApiClient, PriceFetchError};

/// Subset of the ticker payload the engine cares about.
#[derive(Debug, Deserialize)]
struct TickerResponse {
    price: String,
}

/// Client for a spot-price ticker answering `{"price": "<decimal>"}`, the
/// shape the Coinbase product ticker uses. Extra payload fields are
/// ignored.
#[derive(Debug, Clone)]
pub struct TickerApiClient {
    endpoint: Url,
    fiat_decimal_places: u32,
    client: reqwest::Client,
}

impl TickerApiClient {
    pub fn new(endpoint: Url, fiat_decimal_places: u32, client: reqwest::Client) -> Self {
        Self {
            endpoint,
            fiat_decimal_places,
            client,
        }
    }

    /// Builds the client for a chain profile's configured endpoint.
    pub fn for_profile(profile: &ChainProfile, client: reqwest::Client) -> Self {
        Self::new(profile.price_endpoint.clone(), profile.fiat_decimal_places, client)
    }
}

#[async_trait]
impl PriceApiClient for TickerApiClient {
    async fn fetch_price(&self) -> Result<BigDecimal, PriceFetchError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PriceFetchError::BadStatus(status));
        }
        let payload = response
            .json::<TickerResponse>()
            .await
            .map_err(|err| PriceFetchError::MalformedPayload(err.to_string()))?;
        let price = payload
            .price
            .parse::<BigDecimal>()
            .map_err(|_| PriceFetchError::InvalidPrice(payload.price.clone()))?;
        if price <= BigDecimal::default() {
            return Err(PriceFetchError::InvalidPrice(payload.price));
        }
        tracing::trace!(price = %price, endpoint = %self.endpoint, "fetched exchange rate");
        Ok(price.with_scale_round(i64::from(self.fiat_decimal_places), RoundingMode::HalfUp))
    }
}
