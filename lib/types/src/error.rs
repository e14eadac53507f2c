use bigdecimal::BigDecimal;

use crate::amounts::FeeUnit;

/// Malformed numeric input or an impossible unit operation.
///
/// Raised synchronously, before any network access; always fatal to the
/// enclosing call.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("not a plain non-negative decimal: {0:?}")]
    InvalidDecimal(String),
    #[error("cannot convert {from} units to {to} units without an exchange rate")]
    IncompatibleUnits { from: FeeUnit, to: FeeUnit },
    #[error("exchange rate must be positive, got {0}")]
    NonPositiveRate(BigDecimal),
    #[error(
        "chain profile requires native > intermediate > 0 decimal places, \
         got native={native}, intermediate={intermediate}"
    )]
    InvalidProfile { native: u32, intermediate: u32 },
    #[error("policy field {field} must not be negative, got {value}")]
    NegativeLimit { field: &'static str, value: BigDecimal },
    #[error("policy field {field} must be positive, got {value}")]
    NonPositiveMultiplier { field: &'static str, value: BigDecimal },
}
