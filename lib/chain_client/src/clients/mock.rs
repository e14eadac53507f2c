//! Mock chain client for tests.

use async_trait::async_trait;

use feecap_types::TransactionRequest;

use crate::{
    types::{BlockHeader, FeeData, RpcError},
    ChainClient,
};

/// Configurable in-memory [`ChainClient`].
///
/// Defaults to a plain 21000-gas transfer on a quiet zero-price network;
/// builder methods override individual readings or inject failures.
#[derive(Debug, Clone)]
pub struct MockChainClient {
    estimated_gas: u64,
    block_number: u64,
    base_fee_per_gas: u128,
    gas_price: u128,
    estimate_gas_revert: Option<String>,
    latest_block_failure: bool,
    fee_data_failure: bool,
}

impl Default for MockChainClient {
    fn default() -> Self {
        Self {
            estimated_gas: 21_000,
            block_number: 1,
            base_fee_per_gas: 0,
            gas_price: 0,
            estimate_gas_revert: None,
            latest_block_failure: false,
            fee_data_failure: false,
        }
    }
}

impl MockChainClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_estimated_gas(mut self, gas: u64) -> Self {
        self.estimated_gas = gas;
        self
    }

    pub fn with_block_number(mut self, number: u64) -> Self {
        self.block_number = number;
        self
    }

    pub fn with_base_fee_per_gas(mut self, base_fee: u128) -> Self {
        self.base_fee_per_gas = base_fee;
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    /// Makes `estimate_gas` fail the way a node reports a revert.
    pub fn with_estimate_gas_revert(mut self, message: &str) -> Self {
        self.estimate_gas_revert = Some(message.to_owned());
        self
    }

    pub fn with_latest_block_failure(mut self) -> Self {
        self.latest_block_failure = true;
        self
    }

    pub fn with_fee_data_failure(mut self) -> Self {
        self.fee_data_failure = true;
        self
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn estimate_gas(&self, _tx: &TransactionRequest) -> Result<u64, RpcError> {
        if let Some(message) = &self.estimate_gas_revert {
            return Err(RpcError::Rpc {
                code: 3,
                message: message.clone(),
            });
        }
        Ok(self.estimated_gas)
    }

    async fn latest_block(&self) -> Result<BlockHeader, RpcError> {
        if self.latest_block_failure {
            return Err(RpcError::Rpc {
                code: -32000,
                message: "latest block unavailable".to_owned(),
            });
        }
        Ok(BlockHeader {
            number: self.block_number,
            base_fee_per_gas: self.base_fee_per_gas,
        })
    }

    async fn fee_data(&self) -> Result<FeeData, RpcError> {
        if self.fee_data_failure {
            return Err(RpcError::Rpc {
                code: -32000,
                message: "fee data unavailable".to_owned(),
            });
        }
        Ok(FeeData {
            gas_price: self.gas_price,
        })
    }
}
