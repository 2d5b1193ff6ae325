//! Standard fixed-price execution.
//!
//! The simplest rule: the taker accepts the maker's explicit item list and
//! price exactly as signed. Works on both sides.

use agora_types::{AgoraError, MakerOrder, Result, TakerOrder};

use crate::context::{check_amounts, check_price_exact, Fulfillment};

pub(crate) fn validate_maker(maker: &MakerOrder) -> Result<()> {
    check_amounts(maker.asset_kind, &maker.amounts)
}

pub(crate) fn execute(taker: &TakerOrder, maker: &MakerOrder) -> Result<Fulfillment> {
    validate_maker(maker)?;
    check_price_exact(taker.price, maker.price, maker.side)?;
    if taker.item_ids != maker.item_ids {
        return Err(AgoraError::OrderInvalid {
            reason: "taker items do not match the maker's item list".to_string(),
        });
    }
    if taker.amounts != maker.amounts {
        return Err(AgoraError::OrderInvalid {
            reason: "taker amounts do not match the maker's amounts".to_string(),
        });
    }
    Ok(Fulfillment {
        price: maker.price,
        item_ids: maker.item_ids.clone(),
        amounts: maker.amounts.clone(),
    })
}
