//! Shared data model for the feecap fee estimation engine.
//!
//! Fee values are exact decimals tagged with one of four unit systems (see
//! [`FeeUnit`]); binary floats never enter the fee math. The unit constants
//! for a chain family live in a [`ChainProfile`], which parameterizes the
//! whole engine.

pub mod amounts;
pub mod chain;
pub mod conversion;
mod error;
pub mod fee;
pub mod transaction;

pub use bigdecimal::BigDecimal;

pub use self::{
    amounts::{Amount, FeeUnit},
    chain::ChainProfile,
    conversion::UnitConverter,
    error::ValidationError,
    fee::{FeeBreakdown, FeeEstimate, GasPriceSnapshot, LimitCheck, LimitChecks},
    transaction::TransactionRequest,
};
