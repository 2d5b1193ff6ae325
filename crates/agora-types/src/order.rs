//! Maker and taker order types.
//!
//! A [`MakerOrder`] is the signed, off-band intent: an offer to sell (ask)
//! or buy (bid) a set of items at a price under a pluggable pricing rule.
//! A [`TakerOrder`] is the unsigned counter-intent submitted at settlement
//! time; it is authenticated by whoever submits it and never persisted.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Address, GlobalNonce, ItemId, OrderNonce, StrategyId, SubsetNonce};

/// Which side of the exchange the maker is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Side {
    /// Maker sells; `price` is the minimum acceptable.
    Ask,
    /// Maker buys; `price` is the maximum offered.
    Bid,
}

impl Side {
    /// The opposite side.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Ask => Self::Bid,
            Self::Bid => Self::Ask,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ask => write!(f, "ASK"),
            Self::Bid => write!(f, "BID"),
        }
    }
}

/// Token-accounting model of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum AssetKind {
    /// One indivisible unit per item id; transfer amounts must be 1.
    NonFungible,
    /// Multiple fungible units per item id.
    SemiFungible,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFungible => write!(f, "NON_FUNGIBLE"),
            Self::SemiFungible => write!(f, "SEMI_FUNGIBLE"),
        }
    }
}

/// A signed maker intent. Immutable once signed.
///
/// `item_ids` and `amounts` are index-aligned. An empty `item_ids` is only
/// meaningful for collection-level strategies ("any item in collection",
/// resolved at taker time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakerOrder {
    pub side: Side,
    pub signer: Address,
    pub collection: Address,
    pub asset_kind: AssetKind,
    /// Payment currency. [`Address::NATIVE`] is permitted only for asks.
    pub currency: Address,
    /// Integer base units of `currency`.
    pub price: u128,
    pub item_ids: Vec<ItemId>,
    pub amounts: Vec<u64>,
    pub strategy_id: StrategyId,
    /// Per-side epoch snapshot at signing time.
    pub global_nonce: GlobalNonce,
    pub subset_nonce: SubsetNonce,
    /// Unique per signer; the exactly-once settlement key.
    pub order_nonce: OrderNonce,
    /// Unix seconds, inclusive.
    pub start_time: i64,
    /// Unix seconds, inclusive.
    pub end_time: i64,
    /// Opaque strategy payload (auction start price, Merkle root, ...).
    pub additional_parameters: Vec<u8>,
}

impl MakerOrder {
    /// Canonical signing payload.
    ///
    /// Format: `"agora:maker-order:v1:"` followed by every field in
    /// declaration order, fixed-width little-endian, variable-length
    /// sequences prefixed with a u32 element count.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(256);
        payload.extend_from_slice(b"agora:maker-order:v1:");
        payload.push(self.side as u8);
        payload.extend_from_slice(&self.signer.0);
        payload.extend_from_slice(&self.collection.0);
        payload.push(self.asset_kind as u8);
        payload.extend_from_slice(&self.currency.0);
        payload.extend_from_slice(&self.price.to_le_bytes());
        payload.extend_from_slice(&(self.item_ids.len() as u32).to_le_bytes());
        for item_id in &self.item_ids {
            payload.extend_from_slice(&item_id.0.to_le_bytes());
        }
        payload.extend_from_slice(&(self.amounts.len() as u32).to_le_bytes());
        for amount in &self.amounts {
            payload.extend_from_slice(&amount.to_le_bytes());
        }
        payload.extend_from_slice(&self.strategy_id.0.to_le_bytes());
        payload.extend_from_slice(&self.global_nonce.0.to_le_bytes());
        payload.extend_from_slice(&self.subset_nonce.0.to_le_bytes());
        payload.extend_from_slice(&self.order_nonce.0.to_le_bytes());
        payload.extend_from_slice(&self.start_time.to_le_bytes());
        payload.extend_from_slice(&self.end_time.to_le_bytes());
        payload.extend_from_slice(&(self.additional_parameters.len() as u32).to_le_bytes());
        payload.extend_from_slice(&self.additional_parameters);
        payload
    }

    /// SHA-256 digest of the signing payload. This is what gets signed.
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        Sha256::digest(self.signing_payload()).into()
    }

    /// Returns `true` if `now` falls inside `[start_time, end_time]`
    /// extended backwards by the grace window.
    #[must_use]
    pub fn is_live_at(&self, now: i64, grace_secs: i64) -> bool {
        now >= self.start_time.saturating_sub(grace_secs) && now <= self.end_time
    }
}

/// Signature bytes over a maker order digest.
///
/// 64 bytes for the direct ed25519 path; delegated identities may carry an
/// arbitrary attestation blob interpreted by their delegate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSignature(pub Vec<u8>);

impl OrderSignature {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// The unsigned counter-intent submitted at settlement time.
///
/// `recipient` is the taker's account on both legs: it pays and receives
/// items for a taker bid, supplies items and receives proceeds for a taker
/// ask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakerOrder {
    pub recipient: Address,
    pub price: u128,
    pub item_ids: Vec<ItemId>,
    pub amounts: Vec<u64>,
    /// Opaque strategy payload (e.g. a Merkle proof).
    pub additional_parameters: Vec<u8>,
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl MakerOrder {
    /// Standard-strategy maker order with an open validity window.
    pub fn dummy(side: Side, signer: Address, price: u128, item_ids: Vec<ItemId>) -> Self {
        let amounts = vec![1; item_ids.len()];
        Self {
            side,
            signer,
            collection: Address::dummy(0xC0),
            asset_kind: AssetKind::NonFungible,
            currency: Address::dummy(0xEE),
            price,
            item_ids,
            amounts,
            strategy_id: StrategyId(0),
            global_nonce: GlobalNonce(0),
            subset_nonce: SubsetNonce(0),
            order_nonce: OrderNonce(u128::from(rand::random::<u64>())),
            start_time: 0,
            end_time: 2_000_000_000,
            additional_parameters: Vec::new(),
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl TakerOrder {
    /// Taker that mirrors a standard-strategy maker exactly.
    pub fn matching(maker: &MakerOrder, recipient: Address) -> Self {
        Self {
            recipient,
            price: maker.price,
            item_ids: maker.item_ids.clone(),
            amounts: maker.amounts.clone(),
            additional_parameters: Vec::new(),
        }
    }
}
