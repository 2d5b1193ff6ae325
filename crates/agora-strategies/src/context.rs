//! Execution context, fulfillment output, and checks shared by every
//! strategy.

use agora_types::{constants, Address, AgoraError, AssetKind, ItemId, Result, Side};

use crate::oracle::FloorOracle;

/// Everything a strategy sees beyond the two orders.
pub struct ExecutionContext<'a> {
    /// Identity the execution call claims to originate from. Strategies
    /// only run for the settlement coordinator.
    pub caller: Address,
    /// Unix seconds.
    pub now: i64,
    /// Floor-price source. Only the floor strategies read it.
    pub oracle: Option<&'a dyn FloorOracle>,
    /// Oldest oracle quote the floor strategies accept.
    pub floor_price_max_age_secs: i64,
}

impl<'a> ExecutionContext<'a> {
    #[must_use]
    pub fn new(caller: Address, now: i64) -> Self {
        Self {
            caller,
            now,
            oracle: None,
            floor_price_max_age_secs: constants::DEFAULT_FLOOR_PRICE_MAX_AGE_SECS,
        }
    }

    #[must_use]
    pub fn with_oracle(mut self, oracle: &'a dyn FloorOracle, max_age_secs: i64) -> Self {
        self.oracle = Some(oracle);
        self.floor_price_max_age_secs = max_age_secs;
        self
    }
}

/// The priced match a strategy hands back to the coordinator: the exact
/// items to move and the settlement price in currency base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fulfillment {
    pub price: u128,
    pub item_ids: Vec<ItemId>,
    pub amounts: Vec<u64>,
}

/// Every amount must be positive; non-fungible items move one unit at a
/// time.
pub(crate) fn check_amounts(kind: AssetKind, amounts: &[u64]) -> Result<()> {
    for &amount in amounts {
        if amount == 0 {
            return Err(AgoraError::OrderInvalid {
                reason: "amounts must be positive".to_string(),
            });
        }
        if kind == AssetKind::NonFungible && amount != 1 {
            return Err(AgoraError::OrderInvalid {
                reason: "non-fungible amounts must be exactly 1".to_string(),
            });
        }
    }
    Ok(())
}

/// Exact-price rule for fixed-price strategies.
///
/// The taker must hit the maker's price exactly. Shortfall maps to a
/// directional error (`BidTooLow` against an ask, `AskTooHigh` against a
/// bid); overpayment is a malformed taker and rejects as `OrderInvalid`.
pub(crate) fn check_price_exact(taker_price: u128, maker_price: u128, maker_side: Side) -> Result<()> {
    match maker_side {
        Side::Ask => {
            if taker_price < maker_price {
                return Err(AgoraError::BidTooLow {
                    bid: taker_price,
                    required: maker_price,
                });
            }
            if taker_price > maker_price {
                return Err(AgoraError::OrderInvalid {
                    reason: "taker bid exceeds the asked price".to_string(),
                });
            }
        }
        Side::Bid => {
            if taker_price > maker_price {
                return Err(AgoraError::AskTooHigh {
                    ask: taker_price,
                    limit: maker_price,
                });
            }
            if taker_price < maker_price {
                return Err(AgoraError::OrderInvalid {
                    reason: "taker ask undercuts the offered price".to_string(),
                });
            }
        }
    }
    Ok(())
}
