//! Dutch auctions: linear decay from a start price down to the reserve.
//!
//! `maker.price` is the reserve; the auction start price travels in
//! `additional_parameters` (u128) and must not undercut it. The live price
//! decays linearly over `[start_time, end_time]` and clamps to the reserve
//! from `end_time` on. Ask-only.

use agora_types::{AgoraError, MakerOrder, Result, TakerOrder};

use crate::context::{check_amounts, ExecutionContext, Fulfillment};
use crate::params;

pub(crate) fn validate_maker(maker: &MakerOrder) -> Result<()> {
    check_amounts(maker.asset_kind, &maker.amounts)?;
    let start_price = params::read_u128(&maker.additional_parameters)?;
    if start_price < maker.price {
        return Err(AgoraError::OrderInvalid {
            reason: "auction start price is below the reserve".to_string(),
        });
    }
    if maker.start_time >= maker.end_time {
        return Err(AgoraError::OrderInvalid {
            reason: "auction window must have positive duration".to_string(),
        });
    }
    Ok(())
}

/// Live auction price at `now`:
/// `start_price - (start_price - reserve) * elapsed / duration`, clamped
/// to the reserve once the window closes. Integer division truncates
/// toward the start price.
#[allow(clippy::cast_sign_loss)]
pub(crate) fn price_at(maker: &MakerOrder, start_price: u128, now: i64) -> Result<u128> {
    if now >= maker.end_time {
        return Ok(maker.price);
    }
    let elapsed = now.saturating_sub(maker.start_time).max(0) as u128;
    let duration = (maker.end_time - maker.start_time) as u128;
    let decay = (start_price - maker.price)
        .checked_mul(elapsed)
        .ok_or(AgoraError::AmountOverflow)?
        / duration;
    Ok(start_price - decay)
}

pub(crate) fn execute(
    taker: &TakerOrder,
    maker: &MakerOrder,
    ctx: &ExecutionContext<'_>,
) -> Result<Fulfillment> {
    validate_maker(maker)?;
    let start_price = params::read_u128(&maker.additional_parameters)?;
    let price = price_at(maker, start_price, ctx.now)?;

    if taker.price < price {
        return Err(AgoraError::BidTooLow {
            bid: taker.price,
            required: price,
        });
    }
    if !taker.item_ids.is_empty() && taker.item_ids != maker.item_ids {
        return Err(AgoraError::OrderInvalid {
            reason: "taker items do not match the auctioned items".to_string(),
        });
    }

    Ok(Fulfillment {
        price,
        item_ids: maker.item_ids.clone(),
        amounts: maker.amounts.clone(),
    })
}
