//! Lossless conversion between fee units.

use bigdecimal::{BigDecimal, RoundingMode};

use crate::{
    amounts::{Amount, FeeUnit},
    chain::ChainProfile,
    error::ValidationError,
};

/// Converts [`Amount`]s between the units of one [`ChainProfile`].
///
/// Scaling between the chain units is an exact power-of-ten shift. Where a
/// result has to be cut to a unit's canonical decimal places it is
/// truncated (rounded toward zero), never up, so a converted spending
/// ceiling is never more permissive than the configured one. Fiat display
/// conversions are the one exception and round half-up.
#[derive(Debug, Clone)]
pub struct UnitConverter {
    profile: ChainProfile,
}

impl UnitConverter {
    pub fn new(profile: ChainProfile) -> Result<Self, ValidationError> {
        profile.validate()?;
        Ok(Self { profile })
    }

    pub fn profile(&self) -> &ChainProfile {
        &self.profile
    }

    /// Parses a plain non-negative decimal string into an [`Amount`].
    ///
    /// Only digits and at most one `.` are accepted; signs, exponents and
    /// hex notation are rejected.
    pub fn parse(&self, input: &str, unit: FeeUnit) -> Result<Amount, ValidationError> {
        let trimmed = input.trim();
        let mut digits = 0_usize;
        let mut separators = 0_usize;
        for c in trimmed.chars() {
            match c {
                '0'..='9' => digits += 1,
                '.' => separators += 1,
                _ => return Err(ValidationError::InvalidDecimal(input.to_owned())),
            }
        }
        if digits == 0 || separators > 1 {
            return Err(ValidationError::InvalidDecimal(input.to_owned()));
        }
        let value = trimmed
            .parse::<BigDecimal>()
            .map_err(|_| ValidationError::InvalidDecimal(input.to_owned()))?;
        Ok(Amount::new(value, unit))
    }

    /// Converts between the chain units (base, intermediate, native).
    ///
    /// The result is truncated to the target unit's canonical decimal
    /// places. Fiat is not commensurable with the chain units; converting
    /// to or from it needs an exchange rate (see [`Self::to_fiat`] and
    /// [`Self::from_fiat`]).
    pub fn convert(&self, amount: &Amount, to: FeeUnit) -> Result<Amount, ValidationError> {
        let from = amount.unit();
        if from == FeeUnit::Fiat || to == FeeUnit::Fiat {
            return Err(ValidationError::IncompatibleUnits { from, to });
        }
        let shift =
            i64::from(self.profile.decimal_places(from)) - i64::from(self.profile.decimal_places(to));
        let scaled = shift_by_power_of_ten(amount.value(), shift);
        let truncated =
            scaled.with_scale_round(i64::from(self.profile.decimal_places(to)), RoundingMode::Down);
        Ok(Amount::new(truncated, to))
    }

    /// Converts a chain-unit amount into fiat at the given exchange rate.
    ///
    /// Rounds half-up to the fiat decimal places. This is a display
    /// conversion, not a ceiling derivation.
    pub fn to_fiat(&self, amount: &Amount, rate: &BigDecimal) -> Result<Amount, ValidationError> {
        check_rate(rate)?;
        let native = if amount.unit() == FeeUnit::Native {
            amount.clone()
        } else {
            self.convert(amount, FeeUnit::Native)?
        };
        let fiat = (native.value() * rate)
            .with_scale_round(i64::from(self.profile.fiat_decimal_places), RoundingMode::HalfUp);
        Ok(Amount::new(fiat, FeeUnit::Fiat))
    }

    /// Converts a fiat amount into native units at the given exchange rate.
    ///
    /// Truncates to the native decimal places, so a fiat ceiling converted
    /// back to the chain never permits more spend than configured.
    pub fn from_fiat(&self, amount: &Amount, rate: &BigDecimal) -> Result<Amount, ValidationError> {
        check_rate(rate)?;
        if amount.unit() != FeeUnit::Fiat {
            return Err(ValidationError::IncompatibleUnits {
                from: amount.unit(),
                to: FeeUnit::Native,
            });
        }
        let native = (amount.value() / rate)
            .with_scale_round(i64::from(self.profile.native_decimal_places), RoundingMode::Down);
        Ok(Amount::new(native, FeeUnit::Native))
    }
}

fn check_rate(rate: &BigDecimal) -> Result<(), ValidationError> {
    if rate <= &BigDecimal::default() {
        return Err(ValidationError::NonPositiveRate(rate.clone()));
    }
    Ok(())
}

/// Multiplies by `10^exp` exactly, by shifting the decimal exponent.
fn shift_by_power_of_ten(value: &BigDecimal, exp: i64) -> BigDecimal {
    let (digits, scale) = value.as_bigint_and_exponent();
    BigDecimal::new(digits, scale - exp)
}
