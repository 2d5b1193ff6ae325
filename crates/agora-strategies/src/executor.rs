//! Closed-enum strategy dispatch.
//!
//! Every [`StrategyKind`] maps to exactly one execution routine; there is
//! no open plugin surface. The executor also enforces the caller gate:
//! strategies price matches only for the settlement coordinator it was
//! constructed with.

use agora_types::{Address, AgoraError, MakerOrder, Result, Side, StrategyKind, TakerOrder};

use crate::context::{ExecutionContext, Fulfillment};
use crate::{collection, dutch, floor, range, standard};

/// Dispatcher over the closed strategy set.
#[derive(Debug, Clone)]
pub struct StrategyExecutor {
    coordinator: Address,
}

impl StrategyExecutor {
    #[must_use]
    pub fn new(coordinator: Address) -> Self {
        Self { coordinator }
    }

    /// Preflight the maker's strategy-specific structure without a taker.
    pub fn validate_maker(&self, kind: StrategyKind, maker: &MakerOrder) -> Result<()> {
        match kind {
            StrategyKind::Standard => standard::validate_maker(maker),
            StrategyKind::CollectionOffer => collection::validate_maker(maker, false),
            StrategyKind::CollectionOfferWithCriteria => collection::validate_maker(maker, true),
            StrategyKind::ItemIdRange => range::validate_maker(maker),
            StrategyKind::FloorPremiumFixed
            | StrategyKind::FloorPremiumBp
            | StrategyKind::FloorDiscountFixed
            | StrategyKind::FloorDiscountBp => floor::validate_maker(maker),
            StrategyKind::DutchAuction => dutch::validate_maker(maker),
        }
    }

    /// Price a taker/maker pair under `kind`.
    ///
    /// Rejects with `WrongCaller` unless the context's caller is the
    /// coordinator, and with `StrategyNotAvailable` if the kind cannot
    /// execute the maker's side by construction.
    pub fn execute(
        &self,
        kind: StrategyKind,
        taker: &TakerOrder,
        maker: &MakerOrder,
        ctx: &ExecutionContext<'_>,
    ) -> Result<Fulfillment> {
        if ctx.caller != self.coordinator {
            return Err(AgoraError::WrongCaller { caller: ctx.caller });
        }
        let (ask, bid) = kind.default_side_support();
        let side_ok = match maker.side {
            Side::Ask => ask,
            Side::Bid => bid,
        };
        if !side_ok {
            return Err(AgoraError::StrategyNotAvailable {
                strategy_id: maker.strategy_id,
                side: maker.side,
            });
        }

        match kind {
            StrategyKind::Standard => standard::execute(taker, maker),
            StrategyKind::CollectionOffer => collection::execute(taker, maker, false),
            StrategyKind::CollectionOfferWithCriteria => collection::execute(taker, maker, true),
            StrategyKind::ItemIdRange => range::execute(taker, maker),
            StrategyKind::FloorPremiumFixed => floor::execute_premium(taker, maker, ctx, true),
            StrategyKind::FloorPremiumBp => floor::execute_premium(taker, maker, ctx, false),
            StrategyKind::FloorDiscountFixed => floor::execute_discount(taker, maker, ctx, true),
            StrategyKind::FloorDiscountBp => floor::execute_discount(taker, maker, ctx, false),
            StrategyKind::DutchAuction => dutch::execute(taker, maker, ctx),
        }
    }
}
