mod fee_limits;

pub use self::fee_limits::FeeLimitPolicy;
