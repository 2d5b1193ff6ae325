//! Protocol-wide constants.

/// Basis-point denominator for all fee math (100% = 10,000 bp).
pub const BASIS_POINTS: u128 = 10_000;

/// Grace window (seconds) during which a slightly-future start time is
/// treated as already active. Absorbs clock skew between signer and engine.
pub const START_TIME_GRACE_SECS: i64 = 300;

/// Hard cap on any strategy's maximum protocol fee.
pub const PROTOCOL_FEE_HARD_CAP_BP: u16 = 2_500;

/// Default protocol-wide cap on creator royalties.
pub const DEFAULT_MAX_CREATOR_FEE_BP: u16 = 1_000;

/// Default staleness limit for oracle floor prices (seconds).
pub const DEFAULT_FLOOR_PRICE_MAX_AGE_SECS: i64 = 86_400;

/// Maximum entries accepted in one batch call.
pub const MAX_BATCH_ENTRIES: usize = 500;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Agora";
