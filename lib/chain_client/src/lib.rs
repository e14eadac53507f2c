//! Chain RPC client used by the fee estimation engine.
//!
//! [`ChainClient`] is the seam between the engine and the chain: one
//! gas-estimate call plus the two reads a gas price snapshot needs. The
//! engine receives an implementation explicitly at construction; swapping
//! the network means swapping the client instance.

use std::fmt;

use async_trait::async_trait;

use feecap_types::TransactionRequest;

pub mod clients;
mod types;

pub use self::{
    clients::{HttpChainClient, MockChainClient},
    types::{BlockHeader, FeeData, RpcError},
};

/// Chain JSON-RPC interface, as seen by the fee estimation engine.
///
/// No method retries or caches; every call reflects the latest observed
/// state and any failure propagates as [`RpcError`].
#[async_trait]
pub trait ChainClient: 'static + fmt::Debug + Send + Sync {
    /// Simulates the transaction and returns the gas it would consume.
    ///
    /// A transaction that would revert fails here with the node's error.
    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, RpcError>;

    /// Returns the latest block header fields relevant to fee estimation.
    async fn latest_block(&self) -> Result<BlockHeader, RpcError>;

    /// Returns the node's current suggested fee data.
    async fn fee_data(&self) -> Result<FeeData, RpcError>;
}
