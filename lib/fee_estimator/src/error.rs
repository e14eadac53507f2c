use bigdecimal::BigDecimal;

use feecap_chain_client::RpcError;
use feecap_price_api::PriceFetchError;
use feecap_types::ValidationError;

/// Failure while assembling a fee estimate.
///
/// Exceeding a configured spending ceiling is NOT an error; it is reported
/// in the returned estimate's limit checks.
#[derive(Debug, thiserror::Error)]
pub enum FeeEstimateError {
    #[error("invalid numeric input: {0}")]
    Validation(#[from] ValidationError),
    #[error("chain client request failed: {0}")]
    Rpc(#[from] RpcError),
    #[error("exchange rate fetch failed: {0}")]
    PriceFetch(#[from] PriceFetchError),
    /// A zero gas estimate cannot be priced: the per-gas cap implied by the
    /// fiat ceiling would divide by zero.
    #[error("transaction gas estimate is zero")]
    ZeroGasEstimate,
    #[error("gas limit {0} does not fit into u64")]
    GasLimitOverflow(BigDecimal),
}
