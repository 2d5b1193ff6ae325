//! Settlement records: the audit artifact of one successful execution.
//!
//! Records are derived and non-authoritative. The engine emits them for
//! external observers and never reads them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, ItemId, OrderNonce, SettlementId, Side, StrategyId};

/// One payout leg of a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePayout {
    pub recipient: Address,
    pub amount: u128,
}

impl FeePayout {
    #[must_use]
    pub fn new(recipient: Address, amount: u128) -> Self {
        Self { recipient, amount }
    }
}

/// Output of one successful settlement attempt.
///
/// The four legs partition the gross price: `seller + creator + protocol +
/// affiliate == price`, with the affiliate share carved out of the protocol
/// fee rather than added on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub id: SettlementId,
    /// The maker's side.
    pub side: Side,
    pub signer: Address,
    /// The taker's account (also the item or proceeds recipient).
    pub taker: Address,
    pub collection: Address,
    pub currency: Address,
    pub strategy_id: StrategyId,
    pub order_nonce: OrderNonce,
    /// Matched items, as resolved by the strategy.
    pub item_ids: Vec<ItemId>,
    pub amounts: Vec<u64>,
    /// Gross settled price before the fee split.
    pub price: u128,
    pub seller: FeePayout,
    pub creator: Option<FeePayout>,
    pub protocol: FeePayout,
    pub affiliate: Option<FeePayout>,
    pub executed_at: DateTime<Utc>,
}

impl SettlementRecord {
    /// Sum of all payout legs. Equals `price` for every record the engine
    /// emits; exposed so observers can re-check conservation cheaply.
    #[must_use]
    pub fn total_paid(&self) -> u128 {
        self.seller.amount
            + self.creator.map_or(0, |p| p.amount)
            + self.protocol.amount
            + self.affiliate.map_or(0, |p| p.amount)
    }
}
