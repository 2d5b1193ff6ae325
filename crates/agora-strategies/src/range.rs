//! Offers over a closed item-id interval.
//!
//! The maker's `item_ids` encodes the interval as `[lower, upper]` with
//! aligned placeholder amounts; the desired total quantity travels in
//! `additional_parameters` (u64). The taker supplies a strictly increasing
//! item list inside the bounds whose amounts sum exactly to that total.

use agora_types::{AgoraError, ItemId, MakerOrder, Result, TakerOrder};

use crate::context::{check_amounts, check_price_exact, Fulfillment};
use crate::params;

pub(crate) fn validate_maker(maker: &MakerOrder) -> Result<()> {
    if maker.item_ids.len() != 2 {
        return Err(AgoraError::OrderInvalid {
            reason: "range offers carry exactly [lower, upper] item ids".to_string(),
        });
    }
    if maker.item_ids[0] > maker.item_ids[1] {
        return Err(AgoraError::OrderInvalid {
            reason: "range bounds are inverted".to_string(),
        });
    }
    let desired = params::read_u64(&maker.additional_parameters)?;
    if desired == 0 {
        return Err(AgoraError::OrderInvalid {
            reason: "desired quantity must be positive".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn execute(taker: &TakerOrder, maker: &MakerOrder) -> Result<Fulfillment> {
    validate_maker(maker)?;
    check_price_exact(taker.price, maker.price, maker.side)?;

    if taker.item_ids.is_empty() || taker.item_ids.len() != taker.amounts.len() {
        return Err(AgoraError::LengthsInvalid {
            reason: "taker item and amount lists must align and be non-empty".to_string(),
        });
    }
    check_amounts(maker.asset_kind, &taker.amounts)?;

    let lower = maker.item_ids[0];
    let upper = maker.item_ids[1];
    let desired = params::read_u64(&maker.additional_parameters)?;

    let mut total: u64 = 0;
    let mut previous: Option<ItemId> = None;
    for (item_id, &amount) in taker.item_ids.iter().zip(&taker.amounts) {
        if previous.is_some_and(|prev| *item_id <= prev) {
            return Err(AgoraError::OrderInvalid {
                reason: "taker items must be strictly increasing".to_string(),
            });
        }
        if *item_id < lower || *item_id > upper {
            return Err(AgoraError::OrderInvalid {
                reason: format!("{item_id} is outside the offered range"),
            });
        }
        total = total.checked_add(amount).ok_or(AgoraError::AmountOverflow)?;
        previous = Some(*item_id);
    }
    if total != desired {
        return Err(AgoraError::OrderInvalid {
            reason: format!("taker supplies {total} units, offer wants {desired}"),
        });
    }

    Ok(Fulfillment {
        price: maker.price,
        item_ids: taker.item_ids.clone(),
        amounts: taker.amounts.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::{Address, AssetKind, Side};

    /// Bid for 3 non-fungible items with ids in [10, 20].
    fn range_offer() -> MakerOrder {
        let mut maker =
            MakerOrder::dummy(Side::Bid, Address::dummy(1), 3_000, vec![ItemId(10), ItemId(20)]);
        maker.additional_parameters = params::encode_u64(3);
        maker
    }

    fn taker_with(maker: &MakerOrder, items: Vec<ItemId>, amounts: Vec<u64>) -> TakerOrder {
        TakerOrder {
            recipient: Address::dummy(2),
            price: maker.price,
            item_ids: items,
            amounts,
            additional_parameters: Vec::new(),
        }
    }

    #[test]
    fn in_range_items_settle() {
        let maker = range_offer();
        let taker = taker_with(
            &maker,
            vec![ItemId(11), ItemId(15), ItemId(20)],
            vec![1, 1, 1],
        );
        let fill = execute(&taker, &maker).unwrap();
        assert_eq!(fill.price, 3_000);
        assert_eq!(fill.item_ids.len(), 3);
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut maker = range_offer();
        maker.additional_parameters = params::encode_u64(2);
        let taker = taker_with(&maker, vec![ItemId(10), ItemId(20)], vec![1, 1]);
        assert!(execute(&taker, &maker).is_ok());
    }

    #[test]
    fn out_of_range_item_rejected() {
        let maker = range_offer();
        let taker = taker_with(
            &maker,
            vec![ItemId(11), ItemId(21), ItemId(22)],
            vec![1, 1, 1],
        );
        assert!(matches!(
            execute(&taker, &maker),
            Err(AgoraError::OrderInvalid { .. })
        ));
    }

    #[test]
    fn duplicate_items_rejected() {
        let maker = range_offer();
        let taker = taker_with(
            &maker,
            vec![ItemId(11), ItemId(11), ItemId(12)],
            vec![1, 1, 1],
        );
        assert!(matches!(
            execute(&taker, &maker),
            Err(AgoraError::OrderInvalid { .. })
        ));
    }

    #[test]
    fn quantity_shortfall_rejected() {
        let maker = range_offer();
        let taker = taker_with(&maker, vec![ItemId(11), ItemId(12)], vec![1, 1]);
        assert!(matches!(
            execute(&taker, &maker),
            Err(AgoraError::OrderInvalid { .. })
        ));
    }

    #[test]
    fn semi_fungible_amounts_fill_quantity() {
        let mut maker = range_offer();
        maker.asset_kind = AssetKind::SemiFungible;
        maker.additional_parameters = params::encode_u64(10);
        let taker = taker_with(&maker, vec![ItemId(11), ItemId(12)], vec![4, 6]);
        let fill = execute(&taker, &maker).unwrap();
        assert_eq!(fill.amounts, vec![4, 6]);
    }

    #[test]
    fn inverted_bounds_rejected() {
        let mut maker = range_offer();
        maker.item_ids = vec![ItemId(20), ItemId(10)];
        let taker = taker_with(&maker, vec![ItemId(15)], vec![3]);
        assert!(matches!(
            execute(&taker, &maker),
            Err(AgoraError::OrderInvalid { .. })
        ));
    }

    #[test]
    fn missing_quantity_param_rejected() {
        let mut maker = range_offer();
        maker.additional_parameters = Vec::new();
        let taker = taker_with(&maker, vec![ItemId(15)], vec![3]);
        assert!(matches!(
            execute(&taker, &maker),
            Err(AgoraError::StrategyParamsInvalid { .. })
        ));
    }
}
