//! Engine-level tests over mock chain and price clients.

use std::sync::Arc;

use assert_matches::assert_matches;
use bigdecimal::BigDecimal;

use feecap_chain_client::MockChainClient;
use feecap_config::FeeLimitPolicy;
use feecap_price_api::{ForcedPriceClient, PriceApiClient, PriceFetchError};
use feecap_types::{ChainProfile, FeeUnit, LimitChecks, TransactionRequest, ValidationError};

use crate::{ChainFeeEstimator, FeeEstimateError, FeeEstimator, GasPriceReader};

fn dec(s: &str) -> BigDecimal {
    s.parse().unwrap()
}

/// 20 gwei base fee, 21 gwei suggested gas price: 1 gwei average priority.
fn quiet_network() -> MockChainClient {
    MockChainClient::new()
        .with_block_number(19_000_000)
        .with_base_fee_per_gas(20_000_000_000)
        .with_gas_price(21_000_000_000)
}

fn permissive_policy() -> FeeLimitPolicy {
    FeeLimitPolicy {
        max_fee_per_gas_base: dec("1000000000000"),
        max_priority_fee_per_gas_base: dec("2000000000"),
        max_fee_per_transaction_fiat: dec("100.00"),
        gas_limit_multiplier: dec("1.0"),
        average_priority_fee_multiplier: dec("1.0"),
    }
}

fn estimator(chain: MockChainClient, rate: &str) -> ChainFeeEstimator {
    ChainFeeEstimator::new(
        ChainProfile::ethereum(),
        Arc::new(chain),
        Arc::new(ForcedPriceClient::new(dec(rate))),
    )
    .unwrap()
}

#[derive(Debug)]
struct UnavailablePriceClient;

#[async_trait::async_trait]
impl PriceApiClient for UnavailablePriceClient {
    async fn fetch_price(&self) -> Result<BigDecimal, PriceFetchError> {
        Err(PriceFetchError::MalformedPayload("no price feed".into()))
    }
}

#[tokio::test]
async fn transfer_within_all_limits() {
    let estimator = estimator(quiet_network(), "2000.00");
    let estimate = estimator
        .estimate_fee_from_gas(21_000, &permissive_policy())
        .await
        .unwrap();

    assert_eq!(estimate.estimated_gas, 21_000);
    assert_eq!(estimate.gas_limit, 21_000);

    // 21000 gas at a 20 gwei base fee is 0.00042 ETH, 0.84 USD at 2000.
    assert_eq!(estimate.base_fee.base.value(), &dec("420000000000000"));
    assert_eq!(estimate.base_fee.native.value(), &dec("0.00042"));
    assert_eq!(estimate.base_fee.fiat.value(), &dec("0.84"));

    // Priority fee rides on the 1 gwei observed average.
    assert_eq!(
        estimate.max_priority_fee_per_gas_base.value(),
        &dec("1000000000")
    );
    assert_eq!(estimate.max_priority_fee.fiat.value(), &dec("0.04"));
    assert_eq!(estimate.max_fee.fiat.value(), &dec("0.88"));

    assert!(!estimate.any_limit_exceeded);
    assert!(estimate.limit_exceeded_keys.is_empty());
    assert!(!estimate.limit_checks.base_fee_per_gas_limit.exceeded);
    assert!(estimate.limit_checks.base_fee_per_gas_limit.message.is_empty());

    // No ceiling breached: the reported fee is the nominal total.
    assert_eq!(estimate.fee, estimate.max_fee);
    assert_eq!(
        estimate.fee.base.value(),
        &(estimate.base_fee.base.value() + estimate.max_priority_fee.base.value())
    );
    assert_eq!(estimate.exchange_rate, dec("2000.00"));
    assert_eq!(estimate.gas_prices.block_number, 19_000_000);
}

#[tokio::test]
async fn base_fee_over_fiat_ceiling_short_circuits_the_max_fee_check() {
    let policy = FeeLimitPolicy {
        max_fee_per_transaction_fiat: dec("0.50"),
        ..permissive_policy()
    };
    let estimator = estimator(quiet_network(), "2000.00");
    let estimate = estimator.estimate_fee_from_gas(21_000, &policy).await.unwrap();

    let checks = &estimate.limit_checks;
    assert!(checks.base_fee_fiat_limit.exceeded);
    assert!(checks.base_fee_fiat_limit.message.contains("0.84 USD"));
    // The max-fee check would trivially fail too; it is skipped so the
    // report carries one actionable diagnosis instead of two.
    assert!(!checks.max_fee_fiat_limit.exceeded);
    assert_eq!(
        estimate.limit_exceeded_keys,
        vec![LimitChecks::BASE_FEE_FIAT_LIMIT]
    );
    assert!(estimate.any_limit_exceeded);

    // The reported fee is pinned to the ceiling, exactly.
    assert_eq!(estimate.fee.fiat.value(), &dec("0.50"));
    assert_eq!(estimate.fee.native.value(), &dec("0.00025"));
    assert_eq!(estimate.fee.base.value(), &dec("250000000000000"));
    // The nominal total is still reported untouched.
    assert_eq!(estimate.max_fee.fiat.value(), &dec("0.88"));
}

#[tokio::test]
async fn priority_fee_pushes_past_the_fiat_ceiling() {
    // 100k gas: base fee 4.00 USD fits under 5.00, the 15 gwei average
    // priority fee adds 3.00 USD and pushes the total to 7.00.
    let chain = MockChainClient::new()
        .with_base_fee_per_gas(20_000_000_000)
        .with_gas_price(35_000_000_000);
    let policy = FeeLimitPolicy {
        max_priority_fee_per_gas_base: dec("20000000000"),
        max_fee_per_transaction_fiat: dec("5.00"),
        ..permissive_policy()
    };
    let estimator = estimator(chain, "2000.00");
    let estimate = estimator.estimate_fee_from_gas(100_000, &policy).await.unwrap();

    let checks = &estimate.limit_checks;
    assert!(!checks.base_fee_fiat_limit.exceeded);
    assert!(checks.max_fee_fiat_limit.exceeded);
    assert!(checks.max_fee_fiat_limit.message.contains("7.00 USD"));
    // 2.00 USD of the 3.00 USD priority fee is unusable under the ceiling.
    assert!(checks.max_fee_fiat_limit.message.contains("2.00 USD"));
    assert!(checks.max_fee_fiat_limit.message.contains("3.00 USD"));
    assert_eq!(
        estimate.limit_exceeded_keys,
        vec![LimitChecks::MAX_FEE_FIAT_LIMIT]
    );

    assert_eq!(estimate.fee.fiat.value(), &dec("5.00"));
    assert_eq!(estimate.max_fee.fiat.value(), &dec("7.00"));
}

#[tokio::test]
async fn base_fee_per_gas_ceiling_is_reported_but_does_not_rescale_the_fee() {
    let policy = FeeLimitPolicy {
        max_fee_per_gas_base: dec("10000000000"),
        ..permissive_policy()
    };
    let estimator = estimator(quiet_network(), "2000.00");
    let estimate = estimator.estimate_fee_from_gas(21_000, &policy).await.unwrap();

    let check = &estimate.limit_checks.base_fee_per_gas_limit;
    assert!(check.exceeded);
    assert!(check.message.contains("20 gwei"));
    assert!(check.message.contains("10 gwei"));
    assert_eq!(
        estimate.limit_exceeded_keys,
        vec![LimitChecks::BASE_FEE_PER_GAS_LIMIT]
    );

    // Only the fiat ceilings trigger budget reconciliation.
    assert_eq!(estimate.fee, estimate.max_fee);
}

#[tokio::test]
async fn priority_fee_is_clamped_to_the_policy_ceiling_without_a_limit_check() {
    let policy = FeeLimitPolicy {
        average_priority_fee_multiplier: dec("3.0"),
        ..permissive_policy()
    };
    let estimator = estimator(quiet_network(), "2000.00");
    let estimate = estimator.estimate_fee_from_gas(21_000, &policy).await.unwrap();

    // 1 gwei average tripled exceeds the 2 gwei ceiling.
    assert_eq!(
        estimate.max_priority_fee_per_gas_base.value(),
        &dec("2000000000")
    );
    assert!(!estimate.any_limit_exceeded);
}

#[tokio::test]
async fn clamped_priority_fee_is_monotone_in_the_multiplier() {
    let mut previous = dec("0");
    for multiplier in ["0.5", "1.0", "1.5", "2.0", "3.0", "10.0"] {
        let policy = FeeLimitPolicy {
            average_priority_fee_multiplier: dec(multiplier),
            ..permissive_policy()
        };
        let estimator = estimator(quiet_network(), "2000.00");
        let estimate = estimator.estimate_fee_from_gas(21_000, &policy).await.unwrap();

        let per_gas = estimate.max_priority_fee_per_gas_base.value().clone();
        assert!(per_gas >= previous, "multiplier {multiplier} decreased the fee");
        assert!(per_gas <= dec("2000000000"));
        previous = per_gas;
    }
    assert_eq!(previous, dec("2000000000"));
}

#[tokio::test]
async fn gas_price_below_base_fee_clamps_the_average_priority_fee() {
    let chain = quiet_network().with_gas_price(19_000_000_000);
    let reader = GasPriceReader::new(Arc::new(chain.clone()));
    let snapshot = reader.read().await.unwrap();
    assert_eq!(
        snapshot.average_priority_fee_per_gas.value(),
        &BigDecimal::default()
    );

    let estimator = estimator(chain, "2000.00");
    let estimate = estimator
        .estimate_fee_from_gas(21_000, &permissive_policy())
        .await
        .unwrap();
    assert_eq!(
        estimate.max_priority_fee_per_gas_base.value(),
        &BigDecimal::default()
    );
    assert_eq!(estimate.fee, estimate.base_fee);
}

#[tokio::test]
async fn gas_limit_headroom_rounds_half_up() {
    for (multiplier, expected) in [("1.5", 31_500), ("1.1", 23_100), ("1.00001", 21_000)] {
        let policy = FeeLimitPolicy {
            gas_limit_multiplier: dec(multiplier),
            ..permissive_policy()
        };
        let estimator = estimator(quiet_network(), "2000.00");
        let estimate = estimator.estimate_fee_from_gas(21_000, &policy).await.unwrap();
        assert_eq!(estimate.gas_limit, expected, "multiplier {multiplier}");
    }
}

#[tokio::test]
async fn known_gas_and_simulated_gas_estimates_agree() {
    let policy = permissive_policy();
    let estimator = estimator(quiet_network().with_estimated_gas(21_000), "2000.00");

    let simulated = estimator
        .estimate_fee(&TransactionRequest::default(), &policy)
        .await
        .unwrap();
    let from_gas = estimator.estimate_fee_from_gas(21_000, &policy).await.unwrap();
    assert_eq!(simulated, from_gas);
}

#[tokio::test]
async fn revert_during_simulation_propagates_as_an_rpc_error() {
    let chain = quiet_network().with_estimate_gas_revert("execution reverted");
    let estimator = estimator(chain, "2000.00");
    let err = estimator
        .estimate_fee(&TransactionRequest::default(), &permissive_policy())
        .await
        .unwrap_err();
    assert_matches!(err, FeeEstimateError::Rpc(_));
}

#[tokio::test]
async fn snapshot_failure_propagates_as_an_rpc_error() {
    let chain = quiet_network().with_fee_data_failure();
    let estimator = estimator(chain, "2000.00");
    let err = estimator
        .estimate_fee_from_gas(21_000, &permissive_policy())
        .await
        .unwrap_err();
    assert_matches!(err, FeeEstimateError::Rpc(_));
}

#[tokio::test]
async fn price_feed_failure_is_fatal() {
    let estimator = ChainFeeEstimator::new(
        ChainProfile::ethereum(),
        Arc::new(quiet_network()),
        Arc::new(UnavailablePriceClient),
    )
    .unwrap();
    let err = estimator
        .estimate_fee_from_gas(21_000, &permissive_policy())
        .await
        .unwrap_err();
    assert_matches!(err, FeeEstimateError::PriceFetch(_));
}

#[tokio::test]
async fn zero_gas_estimates_are_rejected() {
    let estimator = estimator(quiet_network(), "2000.00");
    let err = estimator
        .estimate_fee_from_gas(0, &permissive_policy())
        .await
        .unwrap_err();
    assert_matches!(err, FeeEstimateError::ZeroGasEstimate);
}

#[tokio::test]
async fn invalid_policies_are_rejected_before_any_network_call() {
    let policy = FeeLimitPolicy {
        gas_limit_multiplier: dec("0"),
        ..permissive_policy()
    };
    // Both backends would fail if reached.
    let chain = quiet_network()
        .with_latest_block_failure()
        .with_fee_data_failure();
    let estimator = ChainFeeEstimator::new(
        ChainProfile::ethereum(),
        Arc::new(chain),
        Arc::new(UnavailablePriceClient),
    )
    .unwrap();
    let err = estimator.estimate_fee_from_gas(21_000, &policy).await.unwrap_err();
    assert_matches!(
        err,
        FeeEstimateError::Validation(ValidationError::NonPositiveMultiplier { .. })
    );
}

#[tokio::test]
async fn fiat_implied_per_gas_cap_never_breaches_the_ceiling() {
    let policy = FeeLimitPolicy {
        max_fee_per_transaction_fiat: dec("5.00"),
        ..permissive_policy()
    };
    let estimator = estimator(quiet_network(), "2000.00");
    let estimate = estimator.estimate_fee_from_gas(21_000, &policy).await.unwrap();

    assert_eq!(estimate.max_fee_per_gas_base.unit(), FeeUnit::Base);
    // Paying the cap for every estimated gas unit stays within 5.00 USD.
    let worst_case_wei = estimate.max_fee_per_gas_base.value() * BigDecimal::from(21_000_u64);
    let ceiling_wei = dec("5.00") / dec("2000.00") * dec("1000000000000000000");
    assert!(worst_case_wei <= ceiling_wei);
}

#[tokio::test]
async fn serialized_estimates_have_stable_field_names() {
    let estimator = estimator(quiet_network(), "2000.00");
    let estimate = estimator
        .estimate_fee_from_gas(21_000, &permissive_policy())
        .await
        .unwrap();

    let json = serde_json::to_value(&estimate).unwrap();
    for key in [
        "estimated_gas",
        "gas_limit",
        "max_fee_per_gas_base",
        "max_priority_fee_per_gas_base",
        "base_fee",
        "max_priority_fee",
        "max_fee",
        "fee",
        "gas_prices",
        "exchange_rate",
        "limit_checks",
        "limit_exceeded_keys",
        "any_limit_exceeded",
    ] {
        assert!(json.get(key).is_some(), "missing field {key}");
    }
    assert_eq!(json["fee"]["fiat"]["value"], "0.88");
    assert_eq!(json["fee"]["fiat"]["unit"], "fiat");
    assert_eq!(json["limit_checks"]["base_fee_fiat_limit"]["exceeded"], false);
    assert_eq!(json["gas_prices"]["block_number"], 19_000_000);
}
