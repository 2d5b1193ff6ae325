//! Structural and temporal validation of maker orders.
//!
//! Validation is a pure function of the order, the registry snapshots and
//! the caller-supplied clock. It never mutates state, so it doubles as the
//! preflight check embedders run before submitting an order for
//! settlement. Checks run in a fixed sequence and short-circuit on the
//! first failure, each with its own reason code.

use agora_types::{constants, AgoraError, MakerOrder, Result, Side};

use crate::{CurrencyAllowlist, StrategyRegistry};

/// Hard gate every maker order passes before pricing.
#[derive(Debug, Clone)]
pub struct OrderValidator {
    grace_secs: i64,
}

impl OrderValidator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            grace_secs: constants::START_TIME_GRACE_SECS,
        }
    }

    /// Validator with a custom start-time grace window.
    #[must_use]
    pub fn with_grace(grace_secs: i64) -> Self {
        Self { grace_secs }
    }

    pub fn validate(
        &self,
        order: &MakerOrder,
        strategies: &StrategyRegistry,
        currencies: &CurrencyAllowlist,
        now: i64,
    ) -> Result<()> {
        // 1. Validity window must not be inverted
        if order.start_time > order.end_time {
            return Err(AgoraError::WindowInverted {
                start_time: order.start_time,
                end_time: order.end_time,
            });
        }

        // 2. now must fall inside [start - grace, end]
        if now < order.start_time.saturating_sub(self.grace_secs) {
            return Err(AgoraError::TooEarly {
                start_time: order.start_time,
                now,
            });
        }
        if now > order.end_time {
            return Err(AgoraError::TooLate {
                end_time: order.end_time,
                now,
            });
        }

        // 3. Item and amount lists must align; only collection-level
        //    strategies may leave them open
        let row = strategies.get(order.strategy_id)?;
        if !row.kind.permits_open_items() {
            if order.item_ids.is_empty() || order.amounts.is_empty() {
                return Err(AgoraError::LengthsInvalid {
                    reason: "maker item and amount lists must be non-empty".to_string(),
                });
            }
            if order.item_ids.len() != order.amounts.len() {
                return Err(AgoraError::LengthsInvalid {
                    reason: format!(
                        "{} item ids vs {} amounts",
                        order.item_ids.len(),
                        order.amounts.len()
                    ),
                });
            }
        }

        // 4. Strategy must be active and serve the order's side
        if !row.is_active || !row.handles(order.side) {
            return Err(AgoraError::StrategyNotAvailable {
                strategy_id: order.strategy_id,
                side: order.side,
            });
        }

        // 5. Currency must be allow-listed; the native sentinel is ask-only
        if !currencies.is_allowed(order.currency) {
            return Err(AgoraError::CurrencyInvalid {
                currency: order.currency,
            });
        }
        if order.currency.is_native() && order.side == Side::Bid {
            return Err(AgoraError::CurrencyInvalid {
                currency: order.currency,
            });
        }

        Ok(())
    }
}

impl Default for OrderValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::{well_known, Address, ItemId, StrategyId};

    const NOW: i64 = 1_700_000_000;

    fn fixtures() -> (StrategyRegistry, CurrencyAllowlist) {
        let strategies = StrategyRegistry::standard_suite(50, 200, 300).unwrap();
        let mut currencies = CurrencyAllowlist::new();
        currencies.allow(Address::dummy(0xEE));
        currencies.allow(Address::NATIVE);
        (strategies, currencies)
    }

    fn live_order(side: Side) -> MakerOrder {
        let mut order = MakerOrder::dummy(side, Address::dummy(1), 100, vec![ItemId(1)]);
        order.start_time = NOW - 1_000;
        order.end_time = NOW + 1_000;
        order
    }

    #[test]
    fn accepts_live_order() {
        let (strategies, currencies) = fixtures();
        let order = live_order(Side::Ask);
        assert!(OrderValidator::new()
            .validate(&order, &strategies, &currencies, NOW)
            .is_ok());
    }

    #[test]
    fn rejects_inverted_window() {
        let (strategies, currencies) = fixtures();
        let mut order = live_order(Side::Ask);
        order.start_time = NOW + 10;
        order.end_time = NOW - 10;
        assert!(matches!(
            OrderValidator::new().validate(&order, &strategies, &currencies, NOW),
            Err(AgoraError::WindowInverted { .. })
        ));
    }

    #[test]
    fn start_time_grace_window() {
        let (strategies, currencies) = fixtures();
        let mut order = live_order(Side::Ask);
        order.start_time = NOW + 200;

        // 200s early is inside the default 300s grace
        assert!(OrderValidator::new()
            .validate(&order, &strategies, &currencies, NOW)
            .is_ok());

        order.start_time = NOW + 301;
        assert!(matches!(
            OrderValidator::new().validate(&order, &strategies, &currencies, NOW),
            Err(AgoraError::TooEarly { .. })
        ));

        // A zero-grace validator rejects both
        assert!(matches!(
            OrderValidator::with_grace(0).validate(&order, &strategies, &currencies, NOW),
            Err(AgoraError::TooEarly { .. })
        ));
    }

    #[test]
    fn rejects_expired_order() {
        let (strategies, currencies) = fixtures();
        let mut order = live_order(Side::Ask);
        order.end_time = NOW - 1;
        assert!(matches!(
            OrderValidator::new().validate(&order, &strategies, &currencies, NOW),
            Err(AgoraError::TooLate { .. })
        ));
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let (strategies, currencies) = fixtures();
        let mut order = live_order(Side::Ask);
        order.amounts = vec![1, 1];
        assert!(matches!(
            OrderValidator::new().validate(&order, &strategies, &currencies, NOW),
            Err(AgoraError::LengthsInvalid { .. })
        ));

        order.item_ids = Vec::new();
        order.amounts = Vec::new();
        assert!(matches!(
            OrderValidator::new().validate(&order, &strategies, &currencies, NOW),
            Err(AgoraError::LengthsInvalid { .. })
        ));
    }

    #[test]
    fn collection_offer_may_leave_items_open() {
        let (strategies, currencies) = fixtures();
        let mut order = live_order(Side::Bid);
        order.strategy_id = well_known::COLLECTION_OFFER;
        order.item_ids = Vec::new();
        order.amounts = vec![1];
        assert!(OrderValidator::new()
            .validate(&order, &strategies, &currencies, NOW)
            .is_ok());
    }

    #[test]
    fn rejects_unknown_strategy() {
        let (strategies, currencies) = fixtures();
        let mut order = live_order(Side::Ask);
        order.strategy_id = StrategyId(999);
        assert!(matches!(
            OrderValidator::new().validate(&order, &strategies, &currencies, NOW),
            Err(AgoraError::StrategyNotFound(StrategyId(999)))
        ));
    }

    #[test]
    fn rejects_inactive_strategy() {
        let (mut strategies, currencies) = fixtures();
        strategies.set_active(well_known::STANDARD, false).unwrap();
        let order = live_order(Side::Ask);
        assert!(matches!(
            OrderValidator::new().validate(&order, &strategies, &currencies, NOW),
            Err(AgoraError::StrategyNotAvailable { .. })
        ));
    }

    #[test]
    fn rejects_wrong_side_for_strategy() {
        let (strategies, currencies) = fixtures();
        let mut order = live_order(Side::Bid);
        // Dutch auctions are ask-only
        order.strategy_id = well_known::DUTCH_AUCTION;
        assert!(matches!(
            OrderValidator::new().validate(&order, &strategies, &currencies, NOW),
            Err(AgoraError::StrategyNotAvailable { .. })
        ));
    }

    #[test]
    fn rejects_unlisted_currency() {
        let (strategies, currencies) = fixtures();
        let mut order = live_order(Side::Ask);
        order.currency = Address::dummy(0xDD);
        assert!(matches!(
            OrderValidator::new().validate(&order, &strategies, &currencies, NOW),
            Err(AgoraError::CurrencyInvalid { .. })
        ));
    }

    #[test]
    fn native_currency_is_ask_only() {
        let (strategies, currencies) = fixtures();

        let mut ask = live_order(Side::Ask);
        ask.currency = Address::NATIVE;
        assert!(OrderValidator::new()
            .validate(&ask, &strategies, &currencies, NOW)
            .is_ok());

        let mut bid = live_order(Side::Bid);
        bid.currency = Address::NATIVE;
        assert!(matches!(
            OrderValidator::new().validate(&bid, &strategies, &currencies, NOW),
            Err(AgoraError::CurrencyInvalid { .. })
        ));
    }
}
