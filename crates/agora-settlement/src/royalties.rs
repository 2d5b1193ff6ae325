//! Creator royalty sources.
//!
//! The engine asks a [`CreatorFeeSource`] for the royalty terms of each
//! matched item set. Two reference implementations cover the common
//! shapes: one rate per collection, or per-item terms with the bundle
//! consistency rule (every item in a bundle must agree on recipient and
//! rate, otherwise the settlement rejects rather than guessing whose
//! royalty applies).

use std::collections::HashMap;

use agora_types::{Address, AgoraError, ItemId, Result};

/// Royalty terms for one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatorFee {
    pub recipient: Address,
    pub fee_bp: u16,
}

/// Source of creator royalty terms.
pub trait CreatorFeeSource {
    /// Royalty for this `(collection, item set)` at the given gross price.
    /// `Ok(None)` means the collection pays no royalty. Errors when the
    /// items of a bundle disagree on terms.
    fn creator_fee_for(
        &self,
        collection: Address,
        item_ids: &[ItemId],
        price: u128,
    ) -> Result<Option<CreatorFee>>;
}

/// No royalties anywhere. For deployments and tests that opt out.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRoyalties;

impl CreatorFeeSource for NoRoyalties {
    fn creator_fee_for(
        &self,
        _collection: Address,
        _item_ids: &[ItemId],
        _price: u128,
    ) -> Result<Option<CreatorFee>> {
        Ok(None)
    }
}

/// One `(recipient, rate)` per collection.
#[derive(Debug, Default)]
pub struct RoyaltyRegistry {
    entries: HashMap<Address, CreatorFee>,
}

impl RoyaltyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, collection: Address, recipient: Address, fee_bp: u16) {
        self.entries.insert(collection, CreatorFee { recipient, fee_bp });
    }

    pub fn remove(&mut self, collection: Address) {
        self.entries.remove(&collection);
    }
}

impl CreatorFeeSource for RoyaltyRegistry {
    fn creator_fee_for(
        &self,
        collection: Address,
        _item_ids: &[ItemId],
        _price: u128,
    ) -> Result<Option<CreatorFee>> {
        Ok(self.entries.get(&collection).copied())
    }
}

/// Per-item royalty terms with the bundle consistency rule.
#[derive(Debug, Default)]
pub struct ItemRoyaltyTable {
    entries: HashMap<(Address, ItemId), CreatorFee>,
}

impl ItemRoyaltyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, collection: Address, item_id: ItemId, recipient: Address, fee_bp: u16) {
        self.entries
            .insert((collection, item_id), CreatorFee { recipient, fee_bp });
    }
}

impl CreatorFeeSource for ItemRoyaltyTable {
    fn creator_fee_for(
        &self,
        collection: Address,
        item_ids: &[ItemId],
        _price: u128,
    ) -> Result<Option<CreatorFee>> {
        let mut agreed: Option<CreatorFee> = None;
        for (index, item_id) in item_ids.iter().enumerate() {
            let fee = self.entries.get(&(collection, *item_id)).copied();
            if index == 0 {
                agreed = fee;
            } else if fee != agreed {
                return Err(AgoraError::BundleRoyaltyMismatch { collection });
            }
        }
        Ok(agreed)
    }
}
