//! Fiat price ticker client used by the fee estimation engine.

use std::fmt;

use async_trait::async_trait;
use bigdecimal::BigDecimal;

mod forced;
mod ticker;

pub use self::{forced::ForcedPriceClient, ticker::TickerApiClient};

/// Client fetching the native-to-fiat exchange rate.
///
/// One rate fetch per estimate; implementations must not cache across
/// calls so that every estimate prices against the current market.
#[async_trait]
pub trait PriceApiClient: 'static + fmt::Debug + Send + Sync {
    /// Returns the current exchange rate: fiat per one native unit, rounded
    /// to the fiat decimal places.
    async fn fetch_price(&self) -> Result<BigDecimal, PriceFetchError>;
}

/// Price ticker failure. Never retried; fatal to the enclosing estimate.
#[derive(Debug, thiserror::Error)]
pub enum PriceFetchError {
    #[error("request to price ticker failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("price ticker answered with HTTP status {0}")]
    BadStatus(reqwest::StatusCode),
    #[error("malformed ticker payload: {0}")]
    MalformedPayload(String),
    #[error("price ticker returned an unusable price: {0:?}")]
    InvalidPrice(String),
}
