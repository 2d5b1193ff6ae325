//! Strategy descriptors: the closed set of pricing rules and the registry row.
//!
//! Strategies are dispatched as a closed enum resolved through the registry
//! by [`StrategyId`] rather than through dynamically loaded implementations.
//! Extensibility comes from the registration table, not open dispatch.

use serde::{Deserialize, Serialize};

use crate::{constants, AgoraError, Result, Side};

/// The closed set of execution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Fixed-price sale or offer for an explicit item list.
    Standard,
    /// Collection-wide bid; the taker picks the concrete item.
    CollectionOffer,
    /// Collection-wide bid restricted by a Merkle item-set criteria.
    CollectionOfferWithCriteria,
    /// Bid for item ids inside a closed `[lower, upper]` interval.
    ItemIdRange,
    /// Ask priced at the oracle floor plus a fixed premium.
    FloorPremiumFixed,
    /// Ask priced at the oracle floor plus a basis-point premium.
    FloorPremiumBp,
    /// Bid priced at the oracle floor minus a fixed discount.
    FloorDiscountFixed,
    /// Bid priced at the oracle floor minus a basis-point discount.
    FloorDiscountBp,
    /// Ask with linear price decay from a start price down to `maker.price`.
    DutchAuction,
}

impl StrategyKind {
    /// Maker sides this kind can execute by construction: `(ask, bid)`.
    #[must_use]
    pub fn default_side_support(self) -> (bool, bool) {
        match self {
            Self::Standard => (true, true),
            Self::FloorPremiumFixed | Self::FloorPremiumBp | Self::DutchAuction => (true, false),
            Self::CollectionOffer
            | Self::CollectionOfferWithCriteria
            | Self::ItemIdRange
            | Self::FloorDiscountFixed
            | Self::FloorDiscountBp => (false, true),
        }
    }

    /// Collection-level strategies accept an empty maker item list
    /// ("any item in collection", resolved at taker time).
    #[must_use]
    pub fn permits_open_items(self) -> bool {
        matches!(self, Self::CollectionOffer | Self::CollectionOfferWithCriteria)
    }

    /// Strategies whose settlement price comes from the floor oracle.
    #[must_use]
    pub fn reads_oracle(self) -> bool {
        matches!(
            self,
            Self::FloorPremiumFixed
                | Self::FloorPremiumBp
                | Self::FloorDiscountFixed
                | Self::FloorDiscountBp
        )
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "STANDARD"),
            Self::CollectionOffer => write!(f, "COLLECTION_OFFER"),
            Self::CollectionOfferWithCriteria => write!(f, "COLLECTION_OFFER_WITH_CRITERIA"),
            Self::ItemIdRange => write!(f, "ITEM_ID_RANGE"),
            Self::FloorPremiumFixed => write!(f, "FLOOR_PREMIUM_FIXED"),
            Self::FloorPremiumBp => write!(f, "FLOOR_PREMIUM_BP"),
            Self::FloorDiscountFixed => write!(f, "FLOOR_DISCOUNT_FIXED"),
            Self::FloorDiscountBp => write!(f, "FLOOR_DISCOUNT_BP"),
            Self::DutchAuction => write!(f, "DUTCH_AUCTION"),
        }
    }
}

/// One row of the strategy registry.
///
/// Created and updated only by protocol governance; read-only to the
/// settlement path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    pub kind: StrategyKind,
    pub is_active: bool,
    /// Protocol fee charged when royalties already meet the floor.
    pub standard_protocol_fee_bp: u16,
    /// Minimum combined (creator + protocol) fee.
    pub min_total_fee_bp: u16,
    /// Upper bound the protocol fee may stretch to.
    pub max_protocol_fee_bp: u16,
    /// Can execute maker Ask orders.
    pub handles_ask: bool,
    /// Can execute maker Bid orders.
    pub handles_bid: bool,
}

impl Strategy {
    /// Active row with the kind's natural side support.
    #[must_use]
    pub fn new(
        kind: StrategyKind,
        standard_protocol_fee_bp: u16,
        min_total_fee_bp: u16,
        max_protocol_fee_bp: u16,
    ) -> Self {
        let (handles_ask, handles_bid) = kind.default_side_support();
        Self {
            kind,
            is_active: true,
            standard_protocol_fee_bp,
            min_total_fee_bp,
            max_protocol_fee_bp,
            handles_ask,
            handles_bid,
        }
    }

    /// Fee bounds must satisfy
    /// `standard <= minTotal <= maxProtocol <= hard cap`.
    pub fn validate_fee_bounds(&self) -> Result<()> {
        if self.standard_protocol_fee_bp > self.min_total_fee_bp
            || self.min_total_fee_bp > self.max_protocol_fee_bp
            || self.max_protocol_fee_bp > constants::PROTOCOL_FEE_HARD_CAP_BP
        {
            return Err(AgoraError::StrategyFeeBoundsInvalid {
                standard_bp: self.standard_protocol_fee_bp,
                min_total_bp: self.min_total_fee_bp,
                max_protocol_bp: self.max_protocol_fee_bp,
            });
        }
        Ok(())
    }

    /// Whether this row can execute a maker order on `side`.
    #[must_use]
    pub fn handles(&self, side: Side) -> bool {
        match side {
            Side::Ask => self.handles_ask,
            Side::Bid => self.handles_bid,
        }
    }
}

/// Well-known registry ids used by deployments and tests. Nothing in the
/// engine depends on these values; any id may map to any kind.
pub mod well_known {
    use crate::StrategyId;

    pub const STANDARD: StrategyId = StrategyId(0);
    pub const COLLECTION_OFFER: StrategyId = StrategyId(1);
    pub const COLLECTION_OFFER_WITH_CRITERIA: StrategyId = StrategyId(2);
    pub const ITEM_ID_RANGE: StrategyId = StrategyId(3);
    pub const FLOOR_PREMIUM_FIXED: StrategyId = StrategyId(4);
    pub const FLOOR_PREMIUM_BP: StrategyId = StrategyId(5);
    pub const FLOOR_DISCOUNT_FIXED: StrategyId = StrategyId(6);
    pub const FLOOR_DISCOUNT_BP: StrategyId = StrategyId(7);
    pub const DUTCH_AUCTION: StrategyId = StrategyId(8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_supports_both_sides() {
        let row = Strategy::new(StrategyKind::Standard, 50, 200, 300);
        assert!(row.handles(Side::Ask));
        assert!(row.handles(Side::Bid));
    }

    #[test]
    fn dutch_is_ask_only() {
        let row = Strategy::new(StrategyKind::DutchAuction, 50, 200, 300);
        assert!(row.handles(Side::Ask));
        assert!(!row.handles(Side::Bid));
    }

    #[test]
    fn collection_offer_is_bid_only_and_open() {
        let row = Strategy::new(StrategyKind::CollectionOffer, 50, 200, 300);
        assert!(!row.handles(Side::Ask));
        assert!(row.handles(Side::Bid));
        assert!(row.kind.permits_open_items());
        assert!(!StrategyKind::Standard.permits_open_items());
    }

    #[test]
    fn fee_bounds_accepted_when_ordered() {
        let row = Strategy::new(StrategyKind::Standard, 50, 200, 300);
        assert!(row.validate_fee_bounds().is_ok());
    }

    #[test]
    fn fee_bounds_rejected_when_standard_above_min_total() {
        let row = Strategy::new(StrategyKind::Standard, 250, 200, 300);
        let err = row.validate_fee_bounds().unwrap_err();
        assert!(matches!(err, AgoraError::StrategyFeeBoundsInvalid { .. }));
    }

    #[test]
    fn fee_bounds_rejected_above_hard_cap() {
        let cap = constants::PROTOCOL_FEE_HARD_CAP_BP;
        let row = Strategy::new(StrategyKind::Standard, 50, 200, cap + 1);
        assert!(row.validate_fee_bounds().is_err());
    }

    #[test]
    fn oracle_kinds_flagged() {
        assert!(StrategyKind::FloorPremiumBp.reads_oracle());
        assert!(StrategyKind::FloorDiscountFixed.reads_oracle());
        assert!(!StrategyKind::DutchAuction.reads_oracle());
    }
}
