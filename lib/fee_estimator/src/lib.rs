//! Budget-bounded transaction fee estimation.
//!
//! Given an unsigned transaction and a [`FeeLimitPolicy`], the engine
//! produces a [`FeeEstimate`]: a gas price recommendation in the
//! base-fee-plus-priority-fee model, together with the outcome of every
//! configured spending-ceiling check. Exceeding a ceiling is reported as
//! data in the estimate, never as an error.
//!
//! [`FeeLimitPolicy`]: feecap_config::FeeLimitPolicy
//! [`FeeEstimate`]: feecap_types::FeeEstimate

pub mod error;
mod estimator;
pub mod gas_price;

#[cfg(test)]
mod tests;

pub use self::{
    error::FeeEstimateError,
    estimator::{ChainFeeEstimator, FeeEstimator},
    gas_price::GasPriceReader,
};
