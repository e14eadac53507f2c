use serde::{Deserialize, Serialize};
use url::Url;

use crate::{amounts::FeeUnit, error::ValidationError};

/// Decimal places of the base unit. The base unit is indivisible by
/// definition, so this is zero for every chain family.
pub const BASE_UNIT_DECIMAL_PLACES: u32 = 0;

/// Immutable description of a chain family, as far as fee estimation cares.
///
/// One profile replaces per-chain estimator implementations: the engine is
/// parameterized by these constants and the ticker endpoint, nothing else.
/// A profile is established once per session and passed explicitly; there
/// is no process-wide "current network".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainProfile {
    /// Human-readable family name, used in logs only.
    pub name: String,
    /// Base units per native unit, as a power of ten.
    pub native_decimal_places: u32,
    /// Base units per intermediate unit, as a power of ten.
    pub intermediate_decimal_places: u32,
    pub fiat_decimal_places: u32,
    pub base_unit_symbol: String,
    pub intermediate_unit_symbol: String,
    pub native_unit_symbol: String,
    pub fiat_unit_symbol: String,
    /// Ticker endpoint returning the native-to-fiat exchange rate.
    pub price_endpoint: Url,
}

impl ChainProfile {
    pub fn ethereum() -> Self {
        Self {
            name: "ethereum".to_owned(),
            native_decimal_places: 18,
            intermediate_decimal_places: 9,
            fiat_decimal_places: 2,
            base_unit_symbol: "wei".to_owned(),
            intermediate_unit_symbol: "gwei".to_owned(),
            native_unit_symbol: "ETH".to_owned(),
            fiat_unit_symbol: "USD".to_owned(),
            price_endpoint: "https://api.pro.coinbase.com/products/ETH-USD/ticker"
                .parse()
                .expect("static endpoint URL is valid"),
        }
    }

    pub fn polygon() -> Self {
        Self {
            name: "polygon".to_owned(),
            native_unit_symbol: "MATIC".to_owned(),
            price_endpoint: "https://api.pro.coinbase.com/products/MATIC-USD/ticker"
                .parse()
                .expect("static endpoint URL is valid"),
            ..Self::ethereum()
        }
    }

    /// Canonical decimal-place count of `unit` under this profile.
    pub fn decimal_places(&self, unit: FeeUnit) -> u32 {
        match unit {
            FeeUnit::Base => BASE_UNIT_DECIMAL_PLACES,
            FeeUnit::Intermediate => self.intermediate_decimal_places,
            FeeUnit::Native => self.native_decimal_places,
            FeeUnit::Fiat => self.fiat_decimal_places,
        }
    }

    pub fn unit_symbol(&self, unit: FeeUnit) -> &str {
        match unit {
            FeeUnit::Base => &self.base_unit_symbol,
            FeeUnit::Intermediate => &self.intermediate_unit_symbol,
            FeeUnit::Native => &self.native_unit_symbol,
            FeeUnit::Fiat => &self.fiat_unit_symbol,
        }
    }

    /// The native unit must be strictly finer-grained than the intermediate
    /// one, which keeps base-to-native round trips lossless.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.native_decimal_places <= self.intermediate_decimal_places
            || self.intermediate_decimal_places == 0
        {
            return Err(ValidationError::InvalidProfile {
                native: self.native_decimal_places,
                intermediate: self.intermediate_decimal_places,
            });
        }
        Ok(())
    }
}
