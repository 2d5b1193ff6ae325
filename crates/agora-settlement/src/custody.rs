//! Custody seams: where items and currency actually move.
//!
//! The engine never owns balances. It drives two capability traits handed
//! in by the embedder, and both expose journal-mark checkpoints so one
//! settlement attempt (or one whole atomic batch) rolls back as a unit:
//! take a mark, attempt the transfers, and on failure rewind to the mark.
//! Marks nest, so a batch-level mark encloses the per-attempt marks taken
//! inside it.
//!
//! A failing `transfer` may leave earlier moves of the same call applied;
//! callers are expected to bracket with `checkpoint`/`rollback_to`, which
//! the engine always does.

use std::collections::HashMap;

use agora_types::{Address, AgoraError, AssetKind, ItemId, Result};

/// Moves items between holders.
pub trait AssetCustody {
    fn transfer(
        &mut self,
        collection: Address,
        kind: AssetKind,
        from: Address,
        to: Address,
        item_ids: &[ItemId],
        amounts: &[u64],
    ) -> Result<()>;

    /// Journal mark for the current state.
    fn checkpoint(&self) -> usize;

    /// Undo every move recorded after `mark`, newest first.
    fn rollback_to(&mut self, mark: usize);
}

/// Moves currency between holders.
pub trait CurrencyVault {
    fn transfer(&mut self, currency: Address, from: Address, to: Address, amount: u128)
        -> Result<()>;

    fn checkpoint(&self) -> usize;

    fn rollback_to(&mut self, mark: usize);
}

#[derive(Debug, Clone)]
struct AssetMove {
    collection: Address,
    from: Address,
    to: Address,
    item_id: ItemId,
    amount: u64,
}

/// In-memory reference custody: `(collection, item, holder) -> quantity`.
#[derive(Debug, Default)]
pub struct InMemoryCustody {
    holdings: HashMap<(Address, ItemId, Address), u64>,
    journal: Vec<AssetMove>,
}

impl InMemoryCustody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed items into a holder's account.
    pub fn mint(&mut self, collection: Address, holder: Address, item_id: ItemId, amount: u64) {
        *self.holdings.entry((collection, item_id, holder)).or_insert(0) += amount;
    }

    #[must_use]
    pub fn balance_of(&self, collection: Address, item_id: ItemId, holder: Address) -> u64 {
        self.holdings
            .get(&(collection, item_id, holder))
            .copied()
            .unwrap_or(0)
    }

    fn move_units(
        &mut self,
        collection: Address,
        from: Address,
        to: Address,
        item_id: ItemId,
        amount: u64,
    ) -> Result<()> {
        let held = self.balance_of(collection, item_id, from);
        if held < amount {
            return Err(AgoraError::AssetNotOwned {
                collection,
                item_id,
                holder: from,
            });
        }
        let remaining = held - amount;
        if remaining == 0 {
            self.holdings.remove(&(collection, item_id, from));
        } else {
            self.holdings.insert((collection, item_id, from), remaining);
        }
        *self.holdings.entry((collection, item_id, to)).or_insert(0) += amount;
        Ok(())
    }
}

impl AssetCustody for InMemoryCustody {
    fn transfer(
        &mut self,
        collection: Address,
        kind: AssetKind,
        from: Address,
        to: Address,
        item_ids: &[ItemId],
        amounts: &[u64],
    ) -> Result<()> {
        if item_ids.is_empty() || item_ids.len() != amounts.len() {
            return Err(AgoraError::LengthsInvalid {
                reason: "custody transfer lists must align and be non-empty".to_string(),
            });
        }
        for (item_id, &amount) in item_ids.iter().zip(amounts) {
            if kind == AssetKind::NonFungible && amount != 1 {
                return Err(AgoraError::OrderInvalid {
                    reason: "non-fungible transfer amounts must be exactly 1".to_string(),
                });
            }
            self.move_units(collection, from, to, *item_id, amount)?;
            self.journal.push(AssetMove {
                collection,
                from,
                to,
                item_id: *item_id,
                amount,
            });
        }
        Ok(())
    }

    fn checkpoint(&self) -> usize {
        self.journal.len()
    }

    fn rollback_to(&mut self, mark: usize) {
        while self.journal.len() > mark {
            let Some(mv) = self.journal.pop() else {
                break;
            };
            // Exact inverse of an applied move; cannot fail on owned state
            let key_to = (mv.collection, mv.item_id, mv.to);
            let held = self.holdings.get(&key_to).copied().unwrap_or(0);
            let remaining = held.saturating_sub(mv.amount);
            if remaining == 0 {
                self.holdings.remove(&key_to);
            } else {
                self.holdings.insert(key_to, remaining);
            }
            *self
                .holdings
                .entry((mv.collection, mv.item_id, mv.from))
                .or_insert(0) += mv.amount;
        }
    }
}

#[derive(Debug, Clone)]
struct FundsMove {
    currency: Address,
    from: Address,
    to: Address,
    amount: u128,
}

/// In-memory reference vault: `(currency, holder) -> balance`.
#[derive(Debug, Default)]
pub struct InMemoryVault {
    balances: HashMap<(Address, Address), u128>,
    journal: Vec<FundsMove>,
}

impl InMemoryVault {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed currency into a holder's account.
    pub fn deposit(&mut self, currency: Address, holder: Address, amount: u128) {
        *self.balances.entry((currency, holder)).or_insert(0) += amount;
    }

    #[must_use]
    pub fn balance_of(&self, currency: Address, holder: Address) -> u128 {
        self.balances.get(&(currency, holder)).copied().unwrap_or(0)
    }
}

impl CurrencyVault for InMemoryVault {
    fn transfer(
        &mut self,
        currency: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<()> {
        let available = self.balance_of(currency, from);
        if available < amount {
            return Err(AgoraError::InsufficientFunds {
                currency,
                needed: amount,
                available,
            });
        }
        self.balances.insert((currency, from), available - amount);
        *self.balances.entry((currency, to)).or_insert(0) += amount;
        self.journal.push(FundsMove {
            currency,
            from,
            to,
            amount,
        });
        Ok(())
    }

    fn checkpoint(&self) -> usize {
        self.journal.len()
    }

    fn rollback_to(&mut self, mark: usize) {
        while self.journal.len() > mark {
            let Some(mv) = self.journal.pop() else {
                break;
            };
            let to_balance = self.balance_of(mv.currency, mv.to);
            self.balances
                .insert((mv.currency, mv.to), to_balance.saturating_sub(mv.amount));
            *self.balances.entry((mv.currency, mv.from)).or_insert(0) += mv.amount;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addrs() -> (Address, Address, Address) {
        (Address([0xC0; 32]), Address([1; 32]), Address([2; 32]))
    }

    #[test]
    fn custody_transfer_moves_items() {
        let (collection, alice, bob) = addrs();
        let mut custody = InMemoryCustody::new();
        custody.mint(collection, alice, ItemId(1), 1);

        custody
            .transfer(collection, AssetKind::NonFungible, alice, bob, &[ItemId(1)], &[1])
            .unwrap();
        assert_eq!(custody.balance_of(collection, ItemId(1), alice), 0);
        assert_eq!(custody.balance_of(collection, ItemId(1), bob), 1);
    }

    #[test]
    fn custody_rejects_unowned_items() {
        let (collection, alice, bob) = addrs();
        let mut custody = InMemoryCustody::new();
        let err = custody
            .transfer(collection, AssetKind::NonFungible, alice, bob, &[ItemId(1)], &[1])
            .unwrap_err();
        assert!(matches!(err, AgoraError::AssetNotOwned { .. }));
    }

    #[test]
    fn custody_rejects_multi_unit_non_fungible() {
        let (collection, alice, bob) = addrs();
        let mut custody = InMemoryCustody::new();
        custody.mint(collection, alice, ItemId(1), 5);
        assert!(custody
            .transfer(collection, AssetKind::NonFungible, alice, bob, &[ItemId(1)], &[5])
            .is_err());
        assert!(custody
            .transfer(collection, AssetKind::SemiFungible, alice, bob, &[ItemId(1)], &[5])
            .is_ok());
    }

    #[test]
    fn custody_rollback_restores_holdings() {
        let (collection, alice, bob) = addrs();
        let mut custody = InMemoryCustody::new();
        custody.mint(collection, alice, ItemId(1), 1);
        custody.mint(collection, alice, ItemId(2), 1);

        let mark = custody.checkpoint();
        custody
            .transfer(
                collection,
                AssetKind::NonFungible,
                alice,
                bob,
                &[ItemId(1), ItemId(2)],
                &[1, 1],
            )
            .unwrap();
        custody.rollback_to(mark);

        assert_eq!(custody.balance_of(collection, ItemId(1), alice), 1);
        assert_eq!(custody.balance_of(collection, ItemId(2), alice), 1);
        assert_eq!(custody.balance_of(collection, ItemId(1), bob), 0);
    }

    #[test]
    fn partial_transfer_rolls_back_cleanly() {
        let (collection, alice, bob) = addrs();
        let mut custody = InMemoryCustody::new();
        // Alice owns item 1 but not item 2
        custody.mint(collection, alice, ItemId(1), 1);

        let mark = custody.checkpoint();
        let err = custody
            .transfer(
                collection,
                AssetKind::NonFungible,
                alice,
                bob,
                &[ItemId(1), ItemId(2)],
                &[1, 1],
            )
            .unwrap_err();
        assert!(matches!(err, AgoraError::AssetNotOwned { .. }));

        // Item 1 moved before the failure; the bracket undoes it
        assert_eq!(custody.balance_of(collection, ItemId(1), bob), 1);
        custody.rollback_to(mark);
        assert_eq!(custody.balance_of(collection, ItemId(1), alice), 1);
        assert_eq!(custody.balance_of(collection, ItemId(1), bob), 0);
    }

    #[test]
    fn vault_transfer_and_insufficient_funds() {
        let (_, alice, bob) = addrs();
        let currency = Address([0xEE; 32]);
        let mut vault = InMemoryVault::new();
        vault.deposit(currency, alice, 100);

        vault.transfer(currency, alice, bob, 60).unwrap();
        assert_eq!(vault.balance_of(currency, alice), 40);
        assert_eq!(vault.balance_of(currency, bob), 60);

        let err = vault.transfer(currency, alice, bob, 50).unwrap_err();
        assert!(matches!(
            err,
            AgoraError::InsufficientFunds { needed: 50, available: 40, .. }
        ));
    }

    #[test]
    fn vault_rollback_restores_balances() {
        let (_, alice, bob) = addrs();
        let currency = Address([0xEE; 32]);
        let mut vault = InMemoryVault::new();
        vault.deposit(currency, alice, 100);

        vault.transfer(currency, alice, bob, 10).unwrap();
        let mark = vault.checkpoint();
        vault.transfer(currency, alice, bob, 20).unwrap();
        vault.transfer(currency, bob, alice, 5).unwrap();

        vault.rollback_to(mark);
        assert_eq!(vault.balance_of(currency, alice), 90);
        assert_eq!(vault.balance_of(currency, bob), 10);
    }

    #[test]
    fn nested_marks_rewind_in_order() {
        let (_, alice, bob) = addrs();
        let currency = Address([0xEE; 32]);
        let mut vault = InMemoryVault::new();
        vault.deposit(currency, alice, 100);

        let outer = vault.checkpoint();
        vault.transfer(currency, alice, bob, 10).unwrap();
        let inner = vault.checkpoint();
        vault.transfer(currency, alice, bob, 10).unwrap();

        vault.rollback_to(inner);
        assert_eq!(vault.balance_of(currency, bob), 10);
        vault.rollback_to(outer);
        assert_eq!(vault.balance_of(currency, bob), 0);
        assert_eq!(vault.balance_of(currency, alice), 100);
    }
}
