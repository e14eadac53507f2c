use serde::{Deserialize, Serialize};

/// Minimal unsigned transaction shape, sufficient for a gas-estimate call.
///
/// Addresses and calldata are kept as hex strings, exactly the way the
/// JSON-RPC layer expects them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Transferred value in base units.
    pub value: Option<u128>,
    /// Hex-encoded calldata.
    pub input: Option<String>,
}
