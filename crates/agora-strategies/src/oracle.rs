//! Floor-price oracle seam.
//!
//! The engine never fetches prices itself. Embedders implement
//! [`FloorOracle`] over whatever feed they trust and hand it in by
//! reference; the floor strategies are the only readers.

use std::collections::HashMap;

use agora_types::Address;

/// One observed floor price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorQuote {
    /// Floor price in currency base units.
    pub value: u128,
    /// Unix seconds of the last feed update.
    pub updated_at: i64,
}

/// Source of per-collection floor prices.
pub trait FloorOracle {
    fn floor_price(&self, collection: Address) -> Option<FloorQuote>;
}

/// Fixed quote table, for embedders without a live feed and for tests.
#[derive(Debug, Default)]
pub struct StaticFloorOracle {
    quotes: HashMap<Address, FloorQuote>,
}

impl StaticFloorOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, collection: Address, value: u128, updated_at: i64) {
        self.quotes.insert(collection, FloorQuote { value, updated_at });
    }

    pub fn clear(&mut self, collection: Address) {
        self.quotes.remove(&collection);
    }
}

impl FloorOracle for StaticFloorOracle {
    fn floor_price(&self, collection: Address) -> Option<FloorQuote> {
        self.quotes.get(&collection).copied()
    }
}
