use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::{PriceApiClient, PriceFetchError};

/// A "client" that always answers with a fixed, configured rate.
///
/// For tests and offline runs where hitting a real ticker is unwanted.
#[derive(Debug, Clone)]
pub struct ForcedPriceClient {
    rate: BigDecimal,
}

impl ForcedPriceClient {
    pub fn new(rate: BigDecimal) -> Self {
        Self { rate }
    }
}

#[async_trait]
impl PriceApiClient for ForcedPriceClient {
    async fn fetch_price(&self) -> Result<BigDecimal, PriceFetchError> {
        Ok(self.rate.clone())
    }
}
