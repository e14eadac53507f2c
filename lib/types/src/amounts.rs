use std::fmt;

use bigdecimal::{num_bigint::BigInt, BigDecimal};
use serde::Serialize;

/// The four unit systems a fee value can be denominated in.
///
/// `Base`, `Intermediate` and `Native` are fixed power-of-ten multiples of
/// each other; `Fiat` is only reachable through an exchange rate. The
/// canonical decimal-place count of each unit comes from the active
/// [`ChainProfile`](crate::ChainProfile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeUnit {
    /// Smallest indivisible unit of native-currency value (e.g. wei).
    Base,
    /// Human-scaled unit used for gas price display (e.g. gwei).
    Intermediate,
    /// The chain's primary currency denomination (e.g. ETH).
    Native,
    /// Real-world currency (e.g. USD).
    Fiat,
}

impl fmt::Display for FeeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Base => "base",
            Self::Intermediate => "intermediate",
            Self::Native => "native",
            Self::Fiat => "fiat",
        })
    }
}

/// An exact decimal value tagged with the unit it is denominated in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Amount {
    value: BigDecimal,
    unit: FeeUnit,
}

impl Amount {
    pub fn new(value: BigDecimal, unit: FeeUnit) -> Self {
        Self { value, unit }
    }

    /// An integer number of base units (e.g. wei).
    pub fn from_base_units(value: u128) -> Self {
        Self::new(BigDecimal::from(BigInt::from(value)), FeeUnit::Base)
    }

    pub fn zero(unit: FeeUnit) -> Self {
        Self::new(BigDecimal::default(), unit)
    }

    pub fn value(&self) -> &BigDecimal {
        &self.value
    }

    pub fn into_value(self) -> BigDecimal {
        self.value
    }

    pub fn unit(&self) -> FeeUnit {
        self.unit
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
