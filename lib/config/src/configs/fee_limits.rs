use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use feecap_types::ValidationError;

/// Spending ceilings and headroom factors the estimator must respect.
///
/// The engine treats the policy as read-only: ceilings are compared against
/// and reported on, never adjusted. A ceiling of zero means "nothing fits",
/// not "unlimited".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeLimitPolicy {
    /// Ceiling for the network base fee per gas, in base units.
    #[serde(default)]
    pub max_fee_per_gas_base: BigDecimal,
    /// Ceiling for the per-gas priority fee offered, in base units.
    #[serde(default)]
    pub max_priority_fee_per_gas_base: BigDecimal,
    /// Ceiling for the total fee of a single transaction, in fiat.
    #[serde(default)]
    pub max_fee_per_transaction_fiat: BigDecimal,
    /// Headroom applied to the simulated gas usage to obtain the gas limit.
    #[serde(default = "FeeLimitPolicy::default_multiplier")]
    pub gas_limit_multiplier: BigDecimal,
    /// Factor applied to the observed average priority fee when choosing
    /// the offered priority fee.
    #[serde(default = "FeeLimitPolicy::default_multiplier")]
    pub average_priority_fee_multiplier: BigDecimal,
}

impl Default for FeeLimitPolicy {
    fn default() -> Self {
        Self {
            max_fee_per_gas_base: BigDecimal::default(),
            max_priority_fee_per_gas_base: BigDecimal::default(),
            max_fee_per_transaction_fiat: BigDecimal::default(),
            gas_limit_multiplier: Self::default_multiplier(),
            average_priority_fee_multiplier: Self::default_multiplier(),
        }
    }
}

impl FeeLimitPolicy {
    fn default_multiplier() -> BigDecimal {
        BigDecimal::from(1)
    }

    /// Loads the policy from `FEECAP_`-prefixed environment variables, e.g.
    /// `FEECAP_MAX_FEE_PER_TRANSACTION_FIAT=5.00`. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("FEECAP_").from_env()
    }

    /// Rejects negative ceilings and non-positive multipliers.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let zero = BigDecimal::default();
        let limits = [
            ("max_fee_per_gas_base", &self.max_fee_per_gas_base),
            ("max_priority_fee_per_gas_base", &self.max_priority_fee_per_gas_base),
            ("max_fee_per_transaction_fiat", &self.max_fee_per_transaction_fiat),
        ];
        for (field, value) in limits {
            if *value < zero {
                return Err(ValidationError::NegativeLimit { field, value: value.clone() });
            }
        }
        let multipliers = [
            ("gas_limit_multiplier", &self.gas_limit_multiplier),
            ("average_priority_fee_multiplier", &self.average_priority_fee_multiplier),
        ];
        for (field, value) in multipliers {
            if *value <= zero {
                return Err(ValidationError::NonPositiveMultiplier { field, value: value.clone() });
            }
        }
        Ok(())
    }
}
