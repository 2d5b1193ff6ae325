//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::{constants, Address};

/// Static knobs for one exchange deployment.
///
/// Everything here is set once at construction and read-only to the
/// settlement path, like the governance-owned registries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Identity of the settlement coordinator. Strategies refuse execution
    /// for any other caller.
    pub coordinator: Address,
    /// Receiver of the protocol's share of every fee split.
    pub protocol_fee_recipient: Address,
    /// Protocol-wide cap on creator royalties, in basis points.
    pub max_creator_fee_bp: u16,
    /// Floor-price quotes older than this are rejected, in seconds.
    pub floor_price_max_age_secs: i64,
}

impl ProtocolConfig {
    #[must_use]
    pub fn new(coordinator: Address, protocol_fee_recipient: Address) -> Self {
        Self {
            coordinator,
            protocol_fee_recipient,
            max_creator_fee_bp: constants::DEFAULT_MAX_CREATOR_FEE_BP,
            floor_price_max_age_secs: constants::DEFAULT_FLOOR_PRICE_MAX_AGE_SECS,
        }
    }

    /// Override the creator-fee cap.
    #[must_use]
    pub fn with_max_creator_fee_bp(mut self, bp: u16) -> Self {
        self.max_creator_fee_bp = bp;
        self
    }

    /// Override the floor-price staleness limit.
    #[must_use]
    pub fn with_floor_price_max_age(mut self, secs: i64) -> Self {
        self.floor_price_max_age_secs = secs;
        self
    }
}
