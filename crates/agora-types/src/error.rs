//! Error types for the Agora exchange engine.
//!
//! All errors use the `AG_ERR_` prefix convention for easy grepping in logs.
//! Every rejection the engine can produce has its own stable code; callers
//! may rely on codes, never on message wording. Codes are grouped by
//! subsystem:
//! - 1xx: Structural / malformed orders
//! - 2xx: Temporal (validity window)
//! - 3xx: Signature verification
//! - 4xx: Nonce / replay protection
//! - 5xx: Strategy and economic mismatches
//! - 6xx: External data (currency list, price oracle)
//! - 7xx: Fees and royalties
//! - 8xx: Settlement and custody
//! - 9xx: Internal

use thiserror::Error;

use crate::{Address, ItemId, OrderNonce, Side, StrategyId};

/// Central error enum for all Agora operations.
#[derive(Debug, Error)]
pub enum AgoraError {
    // =================================================================
    // Structural Errors (1xx)
    // =================================================================
    /// Item/amount vectors are mismatched, required fields are empty, or a
    /// batch is empty/oversized.
    #[error("AG_ERR_100: Lengths invalid: {reason}")]
    LengthsInvalid { reason: String },

    /// The taker/maker pair failed a strategy's matching rules.
    #[error("AG_ERR_101: Order invalid: {reason}")]
    OrderInvalid { reason: String },

    /// `additional_parameters` does not decode for the chosen strategy.
    #[error("AG_ERR_102: Strategy parameters invalid: expected {expected} bytes, got {actual}")]
    StrategyParamsInvalid { expected: usize, actual: usize },

    /// The maker order's side does not match the entry point.
    #[error("AG_ERR_103: Side invalid: expected {expected}, got {actual}")]
    SideInvalid { expected: Side, actual: Side },

    /// Checked arithmetic overflowed while deriving a price or fee.
    #[error("AG_ERR_104: Amount arithmetic overflow")]
    AmountOverflow,

    // =================================================================
    // Temporal Errors (2xx)
    // =================================================================
    /// `now` is before the order's start time minus the grace window.
    #[error("AG_ERR_200: Order not yet active: starts at {start_time}, now {now}")]
    TooEarly { start_time: i64, now: i64 },

    /// `now` is past the order's end time.
    #[error("AG_ERR_201: Order expired: ended at {end_time}, now {now}")]
    TooLate { end_time: i64, now: i64 },

    /// The order's window is inverted (`start_time > end_time`).
    #[error("AG_ERR_202: Validity window inverted: start {start_time} > end {end_time}")]
    WindowInverted { start_time: i64, end_time: i64 },

    // =================================================================
    // Signature Errors (3xx)
    // =================================================================
    /// The maker signature failed to parse or verify.
    #[error("AG_ERR_300: Signature invalid: {reason}")]
    SignatureInvalid { reason: String },

    /// A delegated validity callback rejected the order.
    #[error("AG_ERR_301: Delegated validation failed for signer {signer}")]
    DelegatedValidationFailed { signer: Address },

    // =================================================================
    // Nonce / Replay Errors (4xx)
    // =================================================================
    /// The order nonce was executed or invalidated, its subset nonce was
    /// cancelled, or its global nonce is below the signer's current epoch.
    #[error("AG_ERR_400: Nonce invalid for signer {signer}, {order_nonce}")]
    NonceInvalid {
        signer: Address,
        order_nonce: OrderNonce,
    },

    /// `consume` was called on a non-`Unused` nonce. Unreachable when the
    /// validity check runs first; an engine-contract violation otherwise.
    #[error("AG_ERR_401: Nonce already invalidated for signer {signer}, {order_nonce}")]
    NonceAlreadyInvalidated {
        signer: Address,
        order_nonce: OrderNonce,
    },

    // =================================================================
    // Strategy / Economic Errors (5xx)
    // =================================================================
    /// No registry row for this strategy id.
    #[error("AG_ERR_500: Strategy not found: {0}")]
    StrategyNotFound(StrategyId),

    /// The strategy is inactive or does not serve the order's side.
    #[error("AG_ERR_501: Strategy not available: {strategy_id} for side {side}")]
    StrategyNotAvailable { strategy_id: StrategyId, side: Side },

    /// The taker's bid is below the required price.
    #[error("AG_ERR_502: Bid too low: offered {bid}, required {required}")]
    BidTooLow { bid: u128, required: u128 },

    /// The taker's ask is above the maker's limit.
    #[error("AG_ERR_503: Ask too high: asked {ask}, limit {limit}")]
    AskTooHigh { ask: u128, limit: u128 },

    /// A strategy was invoked by something other than the coordinator.
    #[error("AG_ERR_504: Wrong caller: {caller} is not the settlement coordinator")]
    WrongCaller { caller: Address },

    // =================================================================
    // External Data Errors (6xx)
    // =================================================================
    /// Currency not allow-listed, native sentinel on a bid, or mixed
    /// currencies in a non-atomic batch.
    #[error("AG_ERR_600: Currency invalid: {currency}")]
    CurrencyInvalid { currency: Address },

    /// The oracle floor price is older than the staleness limit.
    #[error("AG_ERR_601: Floor price not recent enough: age {age_secs}s, max {max_age_secs}s")]
    PriceNotRecentEnough { age_secs: i64, max_age_secs: i64 },

    /// The oracle has no quote for this collection.
    #[error("AG_ERR_602: Floor price unavailable for collection {0}")]
    FloorPriceUnavailable(Address),

    /// The oracle returned a non-positive floor price.
    #[error("AG_ERR_603: Floor price invalid")]
    InvalidPrice,

    // =================================================================
    // Fee / Royalty Errors (7xx)
    // =================================================================
    /// Registry row violates `standard <= minTotal <= maxProtocol <= cap`.
    #[error(
        "AG_ERR_700: Strategy fee bounds invalid: standard {standard_bp}bp, \
         min total {min_total_bp}bp, max protocol {max_protocol_bp}bp"
    )]
    StrategyFeeBoundsInvalid {
        standard_bp: u16,
        min_total_bp: u16,
        max_protocol_bp: u16,
    },

    /// The creator royalty rate exceeds the protocol-wide cap.
    #[error("AG_ERR_701: Creator fee too high: {creator_fee_bp}bp, cap {max_creator_fee_bp}bp")]
    CreatorFeeBpTooHigh {
        creator_fee_bp: u16,
        max_creator_fee_bp: u16,
    },

    /// Items of a bundle disagree on royalty recipient or rate.
    #[error("AG_ERR_702: Bundle royalty mismatch for collection {collection}")]
    BundleRoyaltyMismatch { collection: Address },

    // =================================================================
    // Settlement / Custody Errors (8xx)
    // =================================================================
    /// A settlement call re-entered the coordinator while one was in flight.
    #[error("AG_ERR_800: Reentrant settlement call rejected")]
    ReentrancyDetected,

    /// The sender does not hold (enough of) the item being transferred.
    #[error("AG_ERR_801: Asset not owned: {holder} lacks {item_id} of collection {collection}")]
    AssetNotOwned {
        collection: Address,
        item_id: ItemId,
        holder: Address,
    },

    /// The payer's currency balance cannot cover the transfer.
    #[error("AG_ERR_802: Insufficient funds in {currency}: need {needed}, have {available}")]
    InsufficientFunds {
        currency: Address,
        needed: u128,
        available: u128,
    },

    // =================================================================
    // Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error (e.g. illegal phase transition).
    #[error("AG_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, AgoraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = AgoraError::StrategyNotFound(StrategyId(3));
        let msg = format!("{err}");
        assert!(msg.starts_with("AG_ERR_500"), "Got: {msg}");
        assert!(msg.contains("strategy:3"));
    }

    #[test]
    fn bid_too_low_display() {
        let err = AgoraError::BidTooLow {
            bid: 90,
            required: 100,
        };
        let msg = format!("{err}");
        assert!(msg.contains("AG_ERR_502"));
        assert!(msg.contains("90"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn side_invalid_display() {
        let err = AgoraError::SideInvalid {
            expected: Side::Ask,
            actual: Side::Bid,
        };
        let msg = format!("{err}");
        assert!(msg.contains("AG_ERR_103"));
        assert!(msg.contains("ASK"));
        assert!(msg.contains("BID"));
    }

    #[test]
    fn all_errors_have_ag_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(AgoraError::AmountOverflow),
            Box::new(AgoraError::ReentrancyDetected),
            Box::new(AgoraError::InvalidPrice),
            Box::new(AgoraError::Internal("test".into())),
            Box::new(AgoraError::CurrencyInvalid {
                currency: Address::NATIVE,
            }),
            Box::new(AgoraError::NonceInvalid {
                signer: Address([1u8; 32]),
                order_nonce: OrderNonce(9),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("AG_ERR_"),
                "Error missing AG_ERR_ prefix: {msg}"
            );
        }
    }
}
