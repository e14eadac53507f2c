//! Fee estimation result types.

use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::amounts::{Amount, FeeUnit};

/// Gas consumed by a plain value transfer.
pub const BASIC_TRANSFER_GAS: u64 = 21_000;

/// Gas price data observed on the network at a single block.
///
/// Fetched fresh for every estimate; never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GasPriceSnapshot {
    pub block_number: u64,
    /// Network-determined minimum fee per gas unit, in base units.
    pub base_fee_per_gas: Amount,
    /// Node-suggested gas price, in base units.
    pub gas_price: Amount,
    /// `gas_price - base_fee_per_gas`, clamped at zero.
    pub average_priority_fee_per_gas: Amount,
}

impl GasPriceSnapshot {
    /// Projected cost of a plain value transfer at these prices, in base
    /// units: `(gas_price + average_priority_fee) * 21000`.
    pub fn basic_transfer_cost(&self) -> Amount {
        let per_gas = self.gas_price.value() + self.average_priority_fee_per_gas.value();
        Amount::new(per_gas * BigDecimal::from(BASIC_TRANSFER_GAS), FeeUnit::Base)
    }
}

/// Outcome of a single configured spending-ceiling check.
///
/// Exceeding a ceiling is reported here, never as an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LimitCheck {
    pub exceeded: bool,
    /// Human-readable diagnostic; empty when the check passed.
    pub message: String,
}

/// The three named ceiling checks performed during one estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LimitChecks {
    pub base_fee_per_gas_limit: LimitCheck,
    pub base_fee_fiat_limit: LimitCheck,
    pub max_fee_fiat_limit: LimitCheck,
}

impl LimitChecks {
    pub const BASE_FEE_PER_GAS_LIMIT: &'static str = "base_fee_per_gas_limit";
    pub const BASE_FEE_FIAT_LIMIT: &'static str = "base_fee_fiat_limit";
    pub const MAX_FEE_FIAT_LIMIT: &'static str = "max_fee_fiat_limit";

    /// Names of the checks that flagged an exceeded ceiling, in declaration
    /// order.
    pub fn exceeded_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.base_fee_per_gas_limit.exceeded {
            keys.push(Self::BASE_FEE_PER_GAS_LIMIT);
        }
        if self.base_fee_fiat_limit.exceeded {
            keys.push(Self::BASE_FEE_FIAT_LIMIT);
        }
        if self.max_fee_fiat_limit.exceeded {
            keys.push(Self::MAX_FEE_FIAT_LIMIT);
        }
        keys
    }

    pub fn any_exceeded(&self) -> bool {
        !self.exceeded_keys().is_empty()
    }
}

/// One fee expressed in all four unit systems.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeBreakdown {
    pub base: Amount,
    pub intermediate: Amount,
    pub native: Amount,
    pub fiat: Amount,
}

/// Immutable result of one fee estimate.
///
/// Serializable with stable field names; downstream scripts log and display
/// it as-is. Callers MUST consult [`Self::any_limit_exceeded`] before using
/// the per-gas parameters to build a transaction: once a fiat ceiling is
/// breached, `fee` is recomputed backward from the ceiling, but
/// `max_fee_per_gas_base` and `max_priority_fee_per_gas_base` still carry
/// the possibly-over-budget values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeEstimate {
    /// Gas usage reported by simulating the transaction.
    pub estimated_gas: u64,
    /// `estimated_gas` with multiplier headroom, for the caller's
    /// transaction parameters. The fee totals below are deliberately priced
    /// against `estimated_gas` instead.
    pub gas_limit: u64,
    /// Per-gas fee cap implied by the fiat ceiling, in base units.
    pub max_fee_per_gas_base: Amount,
    /// Per-gas priority fee after the policy clamp, in base units.
    pub max_priority_fee_per_gas_base: Amount,
    /// `estimated_gas * base_fee_per_gas`.
    pub base_fee: FeeBreakdown,
    /// `estimated_gas * max_priority_fee_per_gas_base`.
    pub max_priority_fee: FeeBreakdown,
    /// `base_fee + max_priority_fee`; the nominal projected total.
    pub max_fee: FeeBreakdown,
    /// Final reported fee after budget reconciliation.
    pub fee: FeeBreakdown,
    pub gas_prices: GasPriceSnapshot,
    /// Native-to-fiat exchange rate used for the fiat conversions.
    pub exchange_rate: BigDecimal,
    pub limit_checks: LimitChecks,
    pub limit_exceeded_keys: Vec<String>,
    pub any_limit_exceeded: bool,
}
