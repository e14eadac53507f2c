//! Externally supplied configuration for the fee estimation engine.

pub mod configs;

pub use self::configs::FeeLimitPolicy;
