//! Gas price acquisition.

use std::sync::Arc;

use feecap_chain_client::{ChainClient, RpcError};
use feecap_types::{Amount, GasPriceSnapshot};

/// Reads the chain's current gas price data into a [`GasPriceSnapshot`].
///
/// Every read hits the node; nothing is cached or retried, so two estimates
/// made a block apart can legitimately disagree.
#[derive(Debug, Clone)]
pub struct GasPriceReader {
    client: Arc<dyn ChainClient>,
}

impl GasPriceReader {
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self { client }
    }

    /// Fetches the latest block's base fee and the node's suggested gas
    /// price, deriving the average priority fee by subtraction.
    pub async fn read(&self) -> Result<GasPriceSnapshot, RpcError> {
        let block = self.client.latest_block().await?;
        let fee_data = self.client.fee_data().await?;

        // Some nodes suggest a gas price below the base fee; a negative
        // priority fee has no meaning downstream, so clamp at zero.
        let average_priority_fee_per_gas =
            match fee_data.gas_price.checked_sub(block.base_fee_per_gas) {
                Some(diff) => diff,
                None => {
                    tracing::warn!(
                        gas_price = fee_data.gas_price,
                        base_fee_per_gas = block.base_fee_per_gas,
                        "suggested gas price is below the base fee, \
                         clamping average priority fee to zero"
                    );
                    0
                }
            };

        Ok(GasPriceSnapshot {
            block_number: block.number,
            base_fee_per_gas: Amount::from_base_units(block.base_fee_per_gas),
            gas_price: Amount::from_base_units(fee_data.gas_price),
            average_priority_fee_per_gas: Amount::from_base_units(average_priority_fee_per_gas),
        })
    }
}
