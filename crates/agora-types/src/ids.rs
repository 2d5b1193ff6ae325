//! Identifiers used throughout Agora.
//!
//! Account-like identities (signers, recipients, collections, currencies)
//! are 32-byte [`Address`]es; for key-holding signers the bytes are the raw
//! ed25519 verifying key. Settlement records use UUIDv7 so they sort by
//! creation time.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 32-byte identity: signer, recipient, collection or currency.
///
/// For signers that hold a key, the bytes are the raw ed25519 public key.
/// The all-zero address is the native-currency sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The native-currency sentinel (all zeroes).
    pub const NATIVE: Self = Self([0u8; 32]);

    #[must_use]
    pub fn from_pubkey(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns `true` for the native-currency sentinel.
    #[must_use]
    pub fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0[..8]))
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    /// Deterministic throwaway address, all bytes set to `tag`.
    #[must_use]
    pub fn dummy(tag: u8) -> Self {
        Self([tag; 32])
    }
}

// ---------------------------------------------------------------------------
// ItemId
// ---------------------------------------------------------------------------

/// Identifier of one item inside a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ItemId(pub u128);

impl From<u128> for ItemId {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// StrategyId
// ---------------------------------------------------------------------------

/// Registry key of an execution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct StrategyId(pub u32);

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "strategy:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// GlobalNonce
// ---------------------------------------------------------------------------

/// Per-signer, per-side epoch counter snapshot.
///
/// Bumping the signer's live counter bulk-invalidates every order signed
/// with a lower value. Comparison-based, so invalidation is O(1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct GlobalNonce(pub u64);

impl GlobalNonce {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for GlobalNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SubsetNonce
// ---------------------------------------------------------------------------

/// Signer-chosen bucket id for selective bulk invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SubsetNonce(pub u128);

impl fmt::Display for SubsetNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subset:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OrderNonce
// ---------------------------------------------------------------------------

/// Unique-per-signer order nonce; the exactly-once settlement key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderNonce(pub u128);

impl fmt::Display for OrderNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nonce:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SettlementId
// ---------------------------------------------------------------------------

/// Globally unique identifier of one successful settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SettlementId(pub Uuid);

impl SettlementId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Deterministic `SettlementId` from the exactly-once key.
    ///
    /// The same `(signer, orderNonce)` always yields the same id, so
    /// external observers can correlate records without coordination.
    #[must_use]
    pub fn deterministic(signer: &Address, order_nonce: OrderNonce) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"agora:settlement_id:v1:");
        hasher.update(signer.0);
        hasher.update(order_nonce.0.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&hash[..16]);
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for SettlementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SettlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
