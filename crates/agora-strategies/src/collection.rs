//! Collection-wide offers, open or criteria-restricted.
//!
//! The maker bids on "any item in this collection" without naming one:
//! `item_ids` stays empty and `amounts` holds the single desired quantity.
//! The taker resolves the offer by supplying exactly one concrete item.
//! The criteria variant additionally requires the taker to prove that item
//! against the Merkle root embedded in the maker's parameters
//! (`additional_parameters` = 32-byte root; taker parameters = proof).

use agora_types::{AgoraError, MakerOrder, Result, TakerOrder};

use crate::context::{check_amounts, check_price_exact, Fulfillment};
use crate::{criteria, params};

pub(crate) fn validate_maker(maker: &MakerOrder, with_criteria: bool) -> Result<()> {
    if !maker.item_ids.is_empty() {
        return Err(AgoraError::OrderInvalid {
            reason: "collection offers leave the item list open".to_string(),
        });
    }
    if maker.amounts.len() != 1 {
        return Err(AgoraError::LengthsInvalid {
            reason: "collection offers carry exactly one desired quantity".to_string(),
        });
    }
    check_amounts(maker.asset_kind, &maker.amounts)?;
    if with_criteria {
        params::read_root(&maker.additional_parameters)?;
    }
    Ok(())
}

pub(crate) fn execute(
    taker: &TakerOrder,
    maker: &MakerOrder,
    with_criteria: bool,
) -> Result<Fulfillment> {
    validate_maker(maker, with_criteria)?;
    check_price_exact(taker.price, maker.price, maker.side)?;

    if taker.item_ids.len() != 1 || taker.amounts.len() != 1 {
        return Err(AgoraError::LengthsInvalid {
            reason: "taker resolves a collection offer with exactly one item".to_string(),
        });
    }
    if taker.amounts[0] != maker.amounts[0] {
        return Err(AgoraError::OrderInvalid {
            reason: "taker amount differs from the offered quantity".to_string(),
        });
    }

    if with_criteria {
        let root = params::read_root(&maker.additional_parameters)?;
        let proof = params::read_proof(&taker.additional_parameters)?;
        let leaf = criteria::leaf_hash(maker.collection, taker.item_ids[0]);
        if !criteria::verify_proof(&leaf, &proof, &root) {
            return Err(AgoraError::OrderInvalid {
                reason: "item is not in the offer's criteria set".to_string(),
            });
        }
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
    use crate::criteria::MerkleTree;
    use agora_types::{Address, ItemId, Side};

    fn open_offer(price: u128) -> MakerOrder {
        let mut maker = MakerOrder::dummy(Side::Bid, Address::dummy(1), price, Vec::new());
        maker.amounts = vec![1];
        maker
    }

    fn resolving_taker(maker: &MakerOrder, item: ItemId) -> TakerOrder {
        TakerOrder {
            recipient: Address::dummy(2),
            price: maker.price,
            item_ids: vec![item],
            amounts: vec![1],
            additional_parameters: Vec::new(),
        }
    }

    #[test]
    fn taker_picks_the_item() {
        let maker = open_offer(500);
        let taker = resolving_taker(&maker, ItemId(42));
        let fill = execute(&taker, &maker, false).unwrap();
        assert_eq!(fill.price, 500);
        assert_eq!(fill.item_ids, vec![ItemId(42)]);
    }

    #[test]
    fn maker_with_named_items_rejected() {
        let mut maker = open_offer(500);
        maker.item_ids = vec![ItemId(1)];
        let taker = resolving_taker(&maker, ItemId(1));
        assert!(matches!(
            execute(&taker, &maker, false),
            Err(AgoraError::OrderInvalid { .. })
        ));
    }

    #[test]
    fn taker_with_two_items_rejected() {
        let maker = open_offer(500);
        let mut taker = resolving_taker(&maker, ItemId(1));
        taker.item_ids = vec![ItemId(1), ItemId(2)];
        taker.amounts = vec![1, 1];
        assert!(matches!(
            execute(&taker, &maker, false),
            Err(AgoraError::LengthsInvalid { .. })
        ));
    }

    #[test]
    fn quantity_must_match_offer() {
        let mut maker = open_offer(500);
        maker.asset_kind = agora_types::AssetKind::SemiFungible;
        maker.amounts = vec![3];
        let mut taker = resolving_taker(&maker, ItemId(1));
        taker.amounts = vec![2];
        assert!(matches!(
            execute(&taker, &maker, false),
            Err(AgoraError::OrderInvalid { .. })
        ));
    }

    #[test]
    fn criteria_offer_accepts_proven_item() {
        let items: Vec<ItemId> = (1..=5).map(ItemId).collect();
        let mut maker = open_offer(500);
        let tree = MerkleTree::from_items(maker.collection, &items);
        maker.additional_parameters = params::encode_root(tree.root().unwrap());

        let mut taker = resolving_taker(&maker, items[2]);
        taker.additional_parameters = params::encode_proof(&tree.proof(2).unwrap());
        let fill = execute(&taker, &maker, true).unwrap();
        assert_eq!(fill.item_ids, vec![items[2]]);
    }

    #[test]
    fn criteria_offer_rejects_unproven_item() {
        let items: Vec<ItemId> = (1..=5).map(ItemId).collect();
        let mut maker = open_offer(500);
        let tree = MerkleTree::from_items(maker.collection, &items);
        maker.additional_parameters = params::encode_root(tree.root().unwrap());

        // Valid proof for item 3, but the taker names item 99
        let mut taker = resolving_taker(&maker, ItemId(99));
        taker.additional_parameters = params::encode_proof(&tree.proof(2).unwrap());
        assert!(matches!(
            execute(&taker, &maker, true),
            Err(AgoraError::OrderInvalid { .. })
        ));
    }

    #[test]
    fn criteria_offer_requires_root() {
        let maker = open_offer(500);
        let taker = resolving_taker(&maker, ItemId(1));
        assert!(matches!(
            execute(&taker, &maker, true),
            Err(AgoraError::StrategyParamsInvalid { .. })
        ));
    }
}
