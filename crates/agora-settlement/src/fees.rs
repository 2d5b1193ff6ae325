//! The fee waterfall.
//!
//! Every settlement splits the gross price four ways:
//!
//! 1. **Creator royalty** at the collection's rate, capped by the
//!    protocol-wide maximum.
//! 2. **Protocol fee** at `max(standard, minTotal - creator)`: when the
//!    royalty already covers the strategy's minimum combined take, the
//!    protocol charges its standard rate; otherwise it stretches to fill
//!    the gap.
//! 3. **Affiliate share**, carved out of the protocol fee (never added on
//!    top) at the affiliate's registered rate.
//! 4. **Seller proceeds**: everything left, including all truncation
//!    remainders from the basis-point divisions.
//!
//! All arithmetic is checked; the split always conserves the gross price
//! exactly.

use std::collections::HashMap;

use agora_types::{constants, Address, AgoraError, Result, Strategy};

/// One computed split of a gross settlement price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub seller_amount: u128,
    pub creator_amount: u128,
    /// Protocol take net of the affiliate carve-out.
    pub protocol_amount: u128,
    pub affiliate_amount: u128,
}

impl FeeSplit {
    /// Sum of all four legs. Equals the input price by construction.
    #[must_use]
    pub fn total(&self) -> u128 {
        self.seller_amount + self.creator_amount + self.protocol_amount + self.affiliate_amount
    }
}

/// Governance-owned affiliate rebate table.
///
/// Rates are basis points of the protocol fee. The whole program can be
/// switched off without clearing individual rates.
#[derive(Debug, Default)]
pub struct AffiliateProgram {
    active: bool,
    rates: HashMap<Address, u16>,
}

impl AffiliateProgram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_rate(&mut self, affiliate: Address, rate_bp: u16) {
        self.rates.insert(affiliate, rate_bp);
    }

    /// Rebate rate for one affiliate; zero when the program is off or the
    /// address is unregistered.
    #[must_use]
    pub fn rate_bp(&self, affiliate: Address) -> u16 {
        if !self.active {
            return 0;
        }
        self.rates.get(&affiliate).copied().unwrap_or(0)
    }
}

/// `amount * bp / 10_000`, truncating.
fn bp_share(amount: u128, bp: u16) -> Result<u128> {
    amount
        .checked_mul(u128::from(bp))
        .map(|v| v / constants::BASIS_POINTS)
        .ok_or(AgoraError::AmountOverflow)
}

/// Split `price` according to the waterfall.
///
/// `creator_fee_bp` must already be resolved for the matched items;
/// `affiliate_rate_bp` is zero when no affiliate is attached. Division
/// truncates and every remainder accrues to the seller, so the protocol
/// never takes a rounding unit the schedule does not grant it.
pub fn compute_split(
    price: u128,
    strategy: &Strategy,
    creator_fee_bp: u16,
    max_creator_fee_bp: u16,
    affiliate_rate_bp: u16,
) -> Result<FeeSplit> {
    if creator_fee_bp > max_creator_fee_bp {
        return Err(AgoraError::CreatorFeeBpTooHigh {
            creator_fee_bp,
            max_creator_fee_bp,
        });
    }

    let protocol_fee_bp = strategy
        .standard_protocol_fee_bp
        .max(strategy.min_total_fee_bp.saturating_sub(creator_fee_bp));

    let creator_amount = bp_share(price, creator_fee_bp)?;
    let gross_protocol = bp_share(price, protocol_fee_bp)?;
    let seller_amount = price
        .checked_sub(creator_amount)
        .and_then(|rest| rest.checked_sub(gross_protocol))
        .ok_or(AgoraError::AmountOverflow)?;

    let affiliate_amount = bp_share(gross_protocol, affiliate_rate_bp)?;
    let protocol_amount = gross_protocol
        .checked_sub(affiliate_amount)
        .ok_or(AgoraError::AmountOverflow)?;

    Ok(FeeSplit {
        seller_amount,
        creator_amount,
        protocol_amount,
        affiliate_amount,
    })
}
