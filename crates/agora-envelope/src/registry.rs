//! Governance-owned lookup tables: strategies and payment currencies.
//!
//! Both tables are mutated by an administrative surface and read-only to
//! the settlement path. Rows are validated on the way in so the engine
//! never observes an inconsistent entry.

use std::collections::{HashMap, HashSet};

use agora_types::{well_known, Address, AgoraError, Result, Strategy, StrategyId, StrategyKind};

/// Table of registered execution strategies.
#[derive(Debug, Default)]
pub struct StrategyRegistry {
    strategies: HashMap<StrategyId, Strategy>,
}

impl StrategyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with every strategy kind under its well-known id,
    /// all sharing one fee schedule.
    pub fn standard_suite(
        standard_protocol_fee_bp: u16,
        min_total_fee_bp: u16,
        max_protocol_fee_bp: u16,
    ) -> Result<Self> {
        let rows = [
            (well_known::STANDARD, StrategyKind::Standard),
            (well_known::COLLECTION_OFFER, StrategyKind::CollectionOffer),
            (
                well_known::COLLECTION_OFFER_WITH_CRITERIA,
                StrategyKind::CollectionOfferWithCriteria,
            ),
            (well_known::ITEM_ID_RANGE, StrategyKind::ItemIdRange),
            (well_known::FLOOR_PREMIUM_FIXED, StrategyKind::FloorPremiumFixed),
            (well_known::FLOOR_PREMIUM_BP, StrategyKind::FloorPremiumBp),
            (well_known::FLOOR_DISCOUNT_FIXED, StrategyKind::FloorDiscountFixed),
            (well_known::FLOOR_DISCOUNT_BP, StrategyKind::FloorDiscountBp),
            (well_known::DUTCH_AUCTION, StrategyKind::DutchAuction),
        ];
        let mut registry = Self::new();
        for (id, kind) in rows {
            registry.register(
                id,
                Strategy::new(
                    kind,
                    standard_protocol_fee_bp,
                    min_total_fee_bp,
                    max_protocol_fee_bp,
                ),
            )?;
        }
        Ok(registry)
    }

    /// Register or replace a row. Fee bounds are checked here so an
    /// invalid schedule never reaches the fee waterfall.
    pub fn register(&mut self, id: StrategyId, strategy: Strategy) -> Result<()> {
        strategy.validate_fee_bounds()?;
        self.strategies.insert(id, strategy);
        Ok(())
    }

    /// Flip a row's activation flag without touching its schedule.
    pub fn set_active(&mut self, id: StrategyId, active: bool) -> Result<()> {
        let row = self
            .strategies
            .get_mut(&id)
            .ok_or(AgoraError::StrategyNotFound(id))?;
        row.is_active = active;
        Ok(())
    }

    pub fn get(&self, id: StrategyId) -> Result<&Strategy> {
        self.strategies
            .get(&id)
            .ok_or(AgoraError::StrategyNotFound(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// Currencies accepted as payment.
///
/// The native sentinel may be listed like any other currency; the order
/// validator still restricts it to maker asks.
#[derive(Debug, Default)]
pub struct CurrencyAllowlist {
    allowed: HashSet<Address>,
}

impl CurrencyAllowlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(&mut self, currency: Address) {
        self.allowed.insert(currency);
    }

    pub fn revoke(&mut self, currency: Address) {
        self.allowed.remove(&currency);
    }

    #[must_use]
    pub fn is_allowed(&self, currency: Address) -> bool {
        self.allowed.contains(&currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_get() {
        let mut registry = StrategyRegistry::new();
        registry
            .register(StrategyId(7), Strategy::new(StrategyKind::Standard, 50, 200, 300))
            .unwrap();
        assert_eq!(registry.get(StrategyId(7)).unwrap().kind, StrategyKind::Standard);
        assert!(matches!(
            registry.get(StrategyId(8)),
            Err(AgoraError::StrategyNotFound(StrategyId(8)))
        ));
    }

    #[test]
    fn register_rejects_bad_fee_bounds() {
        let mut registry = StrategyRegistry::new();
        let err = registry
            .register(StrategyId(1), Strategy::new(StrategyKind::Standard, 400, 200, 300))
            .unwrap_err();
        assert!(matches!(err, AgoraError::StrategyFeeBoundsInvalid { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn set_active_toggles() {
        let mut registry = StrategyRegistry::new();
        registry
            .register(StrategyId(1), Strategy::new(StrategyKind::Standard, 50, 200, 300))
            .unwrap();
        registry.set_active(StrategyId(1), false).unwrap();
        assert!(!registry.get(StrategyId(1)).unwrap().is_active);
        registry.set_active(StrategyId(1), true).unwrap();
        assert!(registry.get(StrategyId(1)).unwrap().is_active);
        assert!(registry.set_active(StrategyId(9), false).is_err());
    }

    #[test]
    fn standard_suite_covers_all_kinds() {
        let registry = StrategyRegistry::standard_suite(50, 200, 300).unwrap();
        assert_eq!(registry.len(), 9);
        assert_eq!(
            registry.get(well_known::DUTCH_AUCTION).unwrap().kind,
            StrategyKind::DutchAuction
        );
    }

    #[test]
    fn allowlist_membership() {
        let mut currencies = CurrencyAllowlist::new();
        let usd = Address::dummy(0xEE);
        assert!(!currencies.is_allowed(usd));
        currencies.allow(usd);
        assert!(currencies.is_allowed(usd));
        currencies.revoke(usd);
        assert!(!currencies.is_allowed(usd));
    }
}
