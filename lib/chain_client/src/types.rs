/// Latest-block fields relevant to fee estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub number: u64,
    /// Base fee per gas in base units; zero on chains that predate it.
    pub base_fee_per_gas: u128,
}

/// Node-suggested fee data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeData {
    /// Suggested gas price in base units.
    pub gas_price: u128,
}

/// Chain client failure. Never retried; propagates to the caller.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Transport-level failure: connectivity, HTTP status, body decoding.
    #[error("request to chain gateway failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The node answered with a JSON-RPC error, e.g. a simulated revert.
    #[error("chain client returned error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// The node answered 2xx with a payload we cannot interpret.
    #[error("malformed RPC response: {0}")]
    Malformed(String),
}
