//! Floor-anchored pricing: oracle floor plus a premium (asks) or minus a
//! discount (bids).
//!
//! The adjustment lives in the maker's `additional_parameters` (u128):
//! either a flat amount in currency base units or a basis-point rate,
//! depending on the strategy kind. The oracle quote must be fresher than
//! the context's staleness limit.
//!
//! For asks, `maker.price` stays the hard minimum: the adjusted floor is
//! only honored when it clears the reserve. For bids, `maker.price` is the
//! hard maximum, and a discount that would cross below zero clamps to
//! zero. When the computed bid lands under the taker's own floor the match
//! rejects as `OrderInvalid`.

use agora_types::{constants, AgoraError, MakerOrder, Result, TakerOrder};

use crate::context::{check_amounts, ExecutionContext, Fulfillment};
use crate::params;

pub(crate) fn validate_maker(maker: &MakerOrder) -> Result<()> {
    check_amounts(maker.asset_kind, &maker.amounts)?;
    params::read_u128(&maker.additional_parameters)?;
    Ok(())
}

/// Read a fresh, positive floor quote off the context.
fn read_floor(ctx: &ExecutionContext<'_>, maker: &MakerOrder) -> Result<u128> {
    let oracle = ctx
        .oracle
        .ok_or(AgoraError::FloorPriceUnavailable(maker.collection))?;
    let quote = oracle
        .floor_price(maker.collection)
        .ok_or(AgoraError::FloorPriceUnavailable(maker.collection))?;
    if quote.value == 0 {
        return Err(AgoraError::InvalidPrice);
    }
    let age_secs = ctx.now.saturating_sub(quote.updated_at);
    if age_secs > ctx.floor_price_max_age_secs {
        return Err(AgoraError::PriceNotRecentEnough {
            age_secs,
            max_age_secs: ctx.floor_price_max_age_secs,
        });
    }
    Ok(quote.value)
}

/// Maker ask at `floor + premium`, never below `maker.price`.
pub(crate) fn execute_premium(
    taker: &TakerOrder,
    maker: &MakerOrder,
    ctx: &ExecutionContext<'_>,
    fixed: bool,
) -> Result<Fulfillment> {
    validate_maker(maker)?;
    let premium = params::read_u128(&maker.additional_parameters)?;
    let floor = read_floor(ctx, maker)?;

    let adjusted = if fixed {
        floor.checked_add(premium).ok_or(AgoraError::AmountOverflow)?
    } else {
        let multiplier = constants::BASIS_POINTS
            .checked_add(premium)
            .ok_or(AgoraError::AmountOverflow)?;
        floor
            .checked_mul(multiplier)
            .ok_or(AgoraError::AmountOverflow)?
            / constants::BASIS_POINTS
    };
    let price = adjusted.max(maker.price);

    if taker.price < price {
        return Err(AgoraError::BidTooLow {
            bid: taker.price,
            required: price,
        });
    }
    check_taker_items(taker, maker)?;

    Ok(Fulfillment {
        price,
        item_ids: maker.item_ids.clone(),
        amounts: maker.amounts.clone(),
    })
}

/// Maker bid at `floor - discount`, clamped at zero, never above
/// `maker.price`.
pub(crate) fn execute_discount(
    taker: &TakerOrder,
    maker: &MakerOrder,
    ctx: &ExecutionContext<'_>,
    fixed: bool,
) -> Result<Fulfillment> {
    validate_maker(maker)?;
    let discount = params::read_u128(&maker.additional_parameters)?;
    let floor = read_floor(ctx, maker)?;

    let adjusted = if fixed {
        floor.saturating_sub(discount)
    } else if discount >= constants::BASIS_POINTS {
        0
    } else {
        floor
            .checked_mul(constants::BASIS_POINTS - discount)
            .ok_or(AgoraError::AmountOverflow)?
            / constants::BASIS_POINTS
    };
    let price = adjusted.min(maker.price);

    // taker.price is the seller's own floor here
    if taker.price > price {
        return Err(AgoraError::OrderInvalid {
            reason: format!(
                "discounted price {price} is below the taker's floor {}",
                taker.price
            ),
        });
    }
    check_taker_items(taker, maker)?;

    Ok(Fulfillment {
        price,
        item_ids: maker.item_ids.clone(),
        amounts: maker.amounts.clone(),
    })
}

/// The maker's explicit item list settles; a taker that names items must
/// name the same ones.
fn check_taker_items(taker: &TakerOrder, maker: &MakerOrder) -> Result<()> {
    if !taker.item_ids.is_empty() && taker.item_ids != maker.item_ids {
        return Err(AgoraError::OrderInvalid {
            reason: "taker items do not match the maker's item list".to_string(),
        });
    }
    Ok(())
}
