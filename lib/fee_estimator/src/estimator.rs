//! The fee estimation and budget enforcement engine.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};

use feecap_chain_client::ChainClient;
use feecap_config::FeeLimitPolicy;
use feecap_price_api::PriceApiClient;
use feecap_types::{
    Amount, ChainProfile, FeeBreakdown, FeeEstimate, FeeUnit, LimitCheck, LimitChecks,
    TransactionRequest, UnitConverter, ValidationError,
};

use crate::{error::FeeEstimateError, gas_price::GasPriceReader};

/// Produces budget-bounded fee estimates for unsigned transactions.
///
/// An implementation is selected once per session and passed explicitly
/// through the call chain; there is no process-wide network state.
#[async_trait]
pub trait FeeEstimator: 'static + fmt::Debug + Send + Sync {
    /// Simulates `tx_request` on the chain and estimates its fees under
    /// `policy`.
    async fn estimate_fee(
        &self,
        tx_request: &TransactionRequest,
        policy: &FeeLimitPolicy,
    ) -> Result<FeeEstimate, FeeEstimateError>;

    /// Estimates fees for a transaction whose gas usage is already known,
    /// skipping the gas-estimate call.
    async fn estimate_fee_from_gas(
        &self,
        estimated_gas: u64,
        policy: &FeeLimitPolicy,
    ) -> Result<FeeEstimate, FeeEstimateError>;
}

/// [`FeeEstimator`] over a chain client and a price ticker, parameterized
/// by one immutable [`ChainProfile`].
///
/// Estimating for a different chain means constructing a separate instance
/// with that chain's profile and clients.
#[derive(Debug)]
pub struct ChainFeeEstimator {
    chain_client: Arc<dyn ChainClient>,
    price_client: Arc<dyn PriceApiClient>,
    gas_price_reader: GasPriceReader,
    converter: UnitConverter,
}

impl ChainFeeEstimator {
    pub fn new(
        profile: ChainProfile,
        chain_client: Arc<dyn ChainClient>,
        price_client: Arc<dyn PriceApiClient>,
    ) -> Result<Self, FeeEstimateError> {
        let converter = UnitConverter::new(profile)?;
        let gas_price_reader = GasPriceReader::new(Arc::clone(&chain_client));
        Ok(Self {
            chain_client,
            price_client,
            gas_price_reader,
            converter,
        })
    }

    pub fn profile(&self) -> &ChainProfile {
        self.converter.profile()
    }

    /// Expresses a base-unit fee in all four unit systems.
    fn breakdown(&self, base: Amount, rate: &BigDecimal) -> Result<FeeBreakdown, ValidationError> {
        let intermediate = self.converter.convert(&base, FeeUnit::Intermediate)?;
        let native = self.converter.convert(&base, FeeUnit::Native)?;
        let fiat = self.converter.to_fiat(&native, rate)?;
        Ok(FeeBreakdown {
            base,
            intermediate,
            native,
            fiat,
        })
    }

    /// Derives the reported fee from the fiat ceiling, so that the fiat
    /// field equals the ceiling exactly.
    fn breakdown_from_fiat_ceiling(
        &self,
        ceiling: &BigDecimal,
        rate: &BigDecimal,
    ) -> Result<FeeBreakdown, ValidationError> {
        let fiat = Amount::new(ceiling.clone(), FeeUnit::Fiat);
        let native = self.converter.from_fiat(&fiat, rate)?;
        let base = self.converter.convert(&native, FeeUnit::Base)?;
        let intermediate = self.converter.convert(&base, FeeUnit::Intermediate)?;
        Ok(FeeBreakdown {
            base,
            intermediate,
            native,
            fiat,
        })
    }

    /// Renders an amount in `unit` with the profile's symbol, for
    /// limit-check messages.
    fn display(&self, amount: &Amount, unit: FeeUnit) -> Result<String, ValidationError> {
        let converted = if amount.unit() == unit {
            amount.clone()
        } else {
            self.converter.convert(amount, unit)?
        };
        Ok(format!(
            "{} {}",
            converted.into_value().normalized(),
            self.profile().unit_symbol(unit)
        ))
    }

    async fn estimate(
        &self,
        estimated_gas: u64,
        policy: &FeeLimitPolicy,
    ) -> Result<FeeEstimate, FeeEstimateError> {
        policy.validate()?;
        if estimated_gas == 0 {
            return Err(FeeEstimateError::ZeroGasEstimate);
        }
        let profile = self.profile();
        let fiat_symbol = profile.fiat_unit_symbol.clone();
        let fiat_scale = i64::from(profile.fiat_decimal_places);
        let gas = BigDecimal::from(estimated_gas);

        // Headroom above the simulated usage, for the caller's transaction
        // parameters. The fee totals below stay on `estimated_gas`.
        let gas_limit_raw =
            (&gas * &policy.gas_limit_multiplier).with_scale_round(0, RoundingMode::HalfUp);
        let gas_limit = gas_limit_raw
            .to_u64()
            .ok_or_else(|| FeeEstimateError::GasLimitOverflow(gas_limit_raw.clone()))?;

        let snapshot = self.gas_price_reader.read().await?;
        let rate = self.price_client.fetch_price().await?;

        let mut checks = LimitChecks::default();

        // The network's base fee against the configured per-gas ceiling.
        if snapshot.base_fee_per_gas.value() > &policy.max_fee_per_gas_base {
            let limit = Amount::new(policy.max_fee_per_gas_base.clone(), FeeUnit::Base);
            checks.base_fee_per_gas_limit = LimitCheck {
                exceeded: true,
                message: format!(
                    "current base fee per gas ({}, {}) exceeds the configured limit ({}, {})",
                    self.display(&snapshot.base_fee_per_gas, FeeUnit::Intermediate)?,
                    self.display(&snapshot.base_fee_per_gas, FeeUnit::Base)?,
                    self.display(&limit, FeeUnit::Intermediate)?,
                    self.display(&limit, FeeUnit::Base)?,
                ),
            };
        }

        // Unavoidable cost of the simulated gas at the current base fee.
        let base_fee = self.breakdown(
            Amount::new(&gas * snapshot.base_fee_per_gas.value(), FeeUnit::Base),
            &rate,
        )?;

        if base_fee.fiat.value() > &policy.max_fee_per_transaction_fiat {
            checks.base_fee_fiat_limit = LimitCheck {
                exceeded: true,
                message: format!(
                    "base fee ({} {fiat_symbol}) exceeds the per-transaction limit \
                     ({} {fiat_symbol}); current base fee is {} ({}, {}) at an exchange \
                     rate of {} {fiat_symbol}",
                    base_fee.fiat.value(),
                    policy.max_fee_per_transaction_fiat,
                    self.display(&base_fee.native, FeeUnit::Native)?,
                    self.display(&base_fee.intermediate, FeeUnit::Intermediate)?,
                    self.display(&base_fee.base, FeeUnit::Base)?,
                    rate,
                ),
            };
        }

        // Per-gas fee cap implied by the fiat ceiling. Both steps truncate,
        // so paying this cap for every unit of `estimated_gas` cannot
        // breach the ceiling.
        let fee_limit_fiat = Amount::new(policy.max_fee_per_transaction_fiat.clone(), FeeUnit::Fiat);
        let fee_limit_native = self.converter.from_fiat(&fee_limit_fiat, &rate)?;
        let fee_limit_base = self.converter.convert(&fee_limit_native, FeeUnit::Base)?;
        let max_fee_per_gas_base =
            (fee_limit_base.value() / &gas).with_scale_round(0, RoundingMode::Down);

        // Offered priority fee: a multiple of the observed average, never
        // above the configured per-gas ceiling. The clamp is silent apart
        // from the log line; it is not a limit check.
        let candidate_priority = (snapshot.average_priority_fee_per_gas.value()
            * &policy.average_priority_fee_multiplier)
            .with_scale_round(0, RoundingMode::HalfUp);
        let max_priority_fee_per_gas_base =
            if candidate_priority > policy.max_priority_fee_per_gas_base {
                tracing::warn!(
                    candidate = %candidate_priority,
                    limit = %policy.max_priority_fee_per_gas_base,
                    average = %snapshot.average_priority_fee_per_gas.value(),
                    "max priority fee per gas exceeds the configured limit, using the limit"
                );
                policy.max_priority_fee_per_gas_base.clone()
            } else {
                candidate_priority
            };

        let max_priority_fee = self.breakdown(
            Amount::new(&gas * &max_priority_fee_per_gas_base, FeeUnit::Base),
            &rate,
        )?;
        let max_fee = self.breakdown(
            Amount::new(
                base_fee.base.value() + max_priority_fee.base.value(),
                FeeUnit::Base,
            ),
            &rate,
        )?;

        // The nominal total against the fiat ceiling. Only meaningful when
        // the base fee alone still fit; otherwise the earlier check already
        // tells the whole story.
        if !checks.base_fee_fiat_limit.exceeded
            && max_fee.fiat.value() > &policy.max_fee_per_transaction_fiat
        {
            let unusable_fiat = Amount::new(
                (max_fee.fiat.value() - &policy.max_fee_per_transaction_fiat)
                    .with_scale_round(fiat_scale, RoundingMode::HalfUp),
                FeeUnit::Fiat,
            );
            let unusable_native = self.converter.from_fiat(&unusable_fiat, &rate)?;
            checks.max_fee_fiat_limit = LimitCheck {
                exceeded: true,
                message: format!(
                    "max fee ({} {fiat_symbol}) exceeds the per-transaction limit \
                     ({} {fiat_symbol}); the transaction cannot use its entire priority \
                     fee: unusable amount is {} ({} {fiat_symbol}) out of {} \
                     ({} {fiat_symbol}) available",
                    max_fee.fiat.value(),
                    policy.max_fee_per_transaction_fiat,
                    self.display(&unusable_native, FeeUnit::Intermediate)?,
                    unusable_fiat.value(),
                    self.display(&max_priority_fee.intermediate, FeeUnit::Intermediate)?,
                    max_priority_fee.fiat.value(),
                ),
            };
        }

        // Budget reconciliation: once a fiat ceiling is breached the
        // reported fee is recomputed backward from the ceiling, so it never
        // displays above the configured budget.
        let fee = if checks.base_fee_fiat_limit.exceeded || checks.max_fee_fiat_limit.exceeded {
            self.breakdown_from_fiat_ceiling(&policy.max_fee_per_transaction_fiat, &rate)?
        } else {
            max_fee.clone()
        };

        let limit_exceeded_keys: Vec<String> = checks
            .exceeded_keys()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let any_limit_exceeded = !limit_exceeded_keys.is_empty();

        Ok(FeeEstimate {
            estimated_gas,
            gas_limit,
            max_fee_per_gas_base: Amount::new(max_fee_per_gas_base, FeeUnit::Base),
            max_priority_fee_per_gas_base: Amount::new(max_priority_fee_per_gas_base, FeeUnit::Base),
            base_fee,
            max_priority_fee,
            max_fee,
            fee,
            gas_prices: snapshot,
            exchange_rate: rate,
            limit_checks: checks,
            limit_exceeded_keys,
            any_limit_exceeded,
        })
    }
}

#[async_trait]
impl FeeEstimator for ChainFeeEstimator {
    async fn estimate_fee(
        &self,
        tx_request: &TransactionRequest,
        policy: &FeeLimitPolicy,
    ) -> Result<FeeEstimate, FeeEstimateError> {
        let estimated_gas = self.chain_client.estimate_gas(tx_request).await?;
        tracing::debug!(estimated_gas, "simulated transaction gas usage");
        self.estimate(estimated_gas, policy).await
    }

    async fn estimate_fee_from_gas(
        &self,
        estimated_gas: u64,
        policy: &FeeLimitPolicy,
    ) -> Result<FeeEstimate, FeeEstimateError> {
        self.estimate(estimated_gas, policy).await
    }
}
