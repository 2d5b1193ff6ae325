//! Replay and invalidation state, keyed by signer.
//!
//! Three independent layers protect each maker order:
//!
//! 1. **Global nonce**: a per-side epoch counter. Orders snapshot it at
//!    signing time; bumping the live counter invalidates every order signed
//!    with a lower snapshot in O(1), no enumeration.
//! 2. **Subset nonce**: a signer-chosen bucket id. Cancelling a subset
//!    kills every order carrying that bucket.
//! 3. **Order nonce**: unique per order, consumed exactly once at
//!    settlement. Re-use is the replay case and always rejects.
//!
//! Consumption is journalled so an aborted atomic batch can restore every
//! nonce it reserved. Signer-initiated cancellations are deliberate and
//! never journalled.

use std::collections::{HashMap, HashSet};

use agora_types::{Address, AgoraError, GlobalNonce, MakerOrder, OrderNonce, Result, Side, SubsetNonce};
use serde::{Deserialize, Serialize};

/// Lifecycle of one order nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Never settled or cancelled. The only state that can settle.
    Unused,
    /// Settled exactly once. Terminal.
    Executed,
    /// Cancelled by the signer before settlement. Terminal.
    Invalidated,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unused => write!(f, "UNUSED"),
            Self::Executed => write!(f, "EXECUTED"),
            Self::Invalidated => write!(f, "INVALIDATED"),
        }
    }
}

/// Replay-protection state for one signer.
///
/// Only non-[`ExecutionStatus::Unused`] order nonces are stored; absence
/// means unused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NonceState {
    pub ask_global_nonce: GlobalNonce,
    pub bid_global_nonce: GlobalNonce,
    pub cancelled_subsets: HashSet<SubsetNonce>,
    pub order_nonces: HashMap<OrderNonce, ExecutionStatus>,
}

impl NonceState {
    /// Live epoch for one side.
    #[must_use]
    pub fn global_nonce(&self, side: Side) -> GlobalNonce {
        match side {
            Side::Ask => self.ask_global_nonce,
            Side::Bid => self.bid_global_nonce,
        }
    }
}

/// Per-signer nonce registry.
///
/// Unknown signers behave as a fresh [`NonceState`]: epoch zero, nothing
/// cancelled, every order nonce unused.
#[derive(Debug, Default)]
pub struct NonceRegistry {
    states: HashMap<Address, NonceState>,
    /// Order nonces consumed since construction, in consumption order.
    /// Marks into this journal let an aborted atomic batch restore them.
    consumed: Vec<(Address, OrderNonce)>,
}

impl NonceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `order` could settle right now: order nonce
    /// unused, subset not cancelled, and the global snapshot at or above
    /// the signer's live epoch for the order's side.
    #[must_use]
    pub fn is_valid(&self, signer: Address, order: &MakerOrder) -> bool {
        let Some(state) = self.states.get(&signer) else {
            return true;
        };
        if state.order_nonces.contains_key(&order.order_nonce) {
            return false;
        }
        if state.cancelled_subsets.contains(&order.subset_nonce) {
            return false;
        }
        order.global_nonce >= state.global_nonce(order.side)
    }

    /// Transition an order nonce `Unused -> Executed`.
    ///
    /// The consumption is journalled so [`Self::rollback_to`] can restore
    /// it. Fails with `NonceAlreadyInvalidated` if the nonce has already
    /// left the unused state; callers are expected to check
    /// [`Self::is_valid`] first.
    pub fn consume(&mut self, signer: Address, order_nonce: OrderNonce) -> Result<()> {
        let state = self.states.entry(signer).or_default();
        if state.order_nonces.contains_key(&order_nonce) {
            return Err(AgoraError::NonceAlreadyInvalidated {
                signer,
                order_nonce,
            });
        }
        state.order_nonces.insert(order_nonce, ExecutionStatus::Executed);
        self.consumed.push((signer, order_nonce));
        Ok(())
    }

    /// Journal mark for the current consumption point.
    #[must_use]
    pub fn checkpoint(&self) -> usize {
        self.consumed.len()
    }

    /// Restore every nonce consumed after `mark` to unused, newest first.
    pub fn rollback_to(&mut self, mark: usize) {
        while self.consumed.len() > mark {
            let Some((signer, order_nonce)) = self.consumed.pop() else {
                break;
            };
            if let Some(state) = self.states.get_mut(&signer) {
                state.order_nonces.remove(&order_nonce);
            }
        }
    }

    /// Signer-initiated epoch bump for one side. Returns the new epoch;
    /// orders signed with a lower snapshot are dead from this point on.
    pub fn bump_global_nonce(&mut self, signer: Address, side: Side) -> GlobalNonce {
        let state = self.states.entry(signer).or_default();
        let slot = match side {
            Side::Ask => &mut state.ask_global_nonce,
            Side::Bid => &mut state.bid_global_nonce,
        };
        *slot = slot.next();
        *slot
    }

    /// Signer-initiated cancellation of whole subset buckets.
    pub fn cancel_subset_nonces(&mut self, signer: Address, subsets: &[SubsetNonce]) {
        let state = self.states.entry(signer).or_default();
        state.cancelled_subsets.extend(subsets.iter().copied());
    }

    /// Signer-initiated cancellation of individual order nonces.
    ///
    /// Nonces already executed stay executed; everything else becomes
    /// [`ExecutionStatus::Invalidated`] and can never settle.
    pub fn cancel_order_nonces(&mut self, signer: Address, nonces: &[OrderNonce]) {
        let state = self.states.entry(signer).or_default();
        for nonce in nonces {
            state
                .order_nonces
                .entry(*nonce)
                .or_insert(ExecutionStatus::Invalidated);
        }
    }

    /// Current status of one order nonce.
    #[must_use]
    pub fn execution_status(&self, signer: Address, order_nonce: OrderNonce) -> ExecutionStatus {
        self.states
            .get(&signer)
            .and_then(|state| state.order_nonces.get(&order_nonce))
            .copied()
            .unwrap_or(ExecutionStatus::Unused)
    }

    /// Live epoch for one side of one signer.
    #[must_use]
    pub fn global_nonce(&self, signer: Address, side: Side) -> GlobalNonce {
        self.states
            .get(&signer)
            .map_or(GlobalNonce(0), |state| state.global_nonce(side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::ItemId;

    fn order_with(signer: Address, order_nonce: u128) -> MakerOrder {
        let mut order = MakerOrder::dummy(Side::Ask, signer, 100, vec![ItemId(1)]);
        order.order_nonce = OrderNonce(order_nonce);
        order
    }

    #[test]
    fn fresh_signer_is_valid() {
        let registry = NonceRegistry::new();
        let signer = Address::dummy(1);
        assert!(registry.is_valid(signer, &order_with(signer, 1)));
        assert_eq!(
            registry.execution_status(signer, OrderNonce(1)),
            ExecutionStatus::Unused
        );
    }

    #[test]
    fn consume_is_exactly_once() {
        let mut registry = NonceRegistry::new();
        let signer = Address::dummy(1);
        let order = order_with(signer, 42);

        registry.consume(signer, order.order_nonce).unwrap();
        assert_eq!(
            registry.execution_status(signer, order.order_nonce),
            ExecutionStatus::Executed
        );
        assert!(!registry.is_valid(signer, &order));

        let err = registry.consume(signer, order.order_nonce).unwrap_err();
        assert!(matches!(err, AgoraError::NonceAlreadyInvalidated { .. }));
    }

    #[test]
    fn global_bump_invalidates_lower_snapshots() {
        let mut registry = NonceRegistry::new();
        let signer = Address::dummy(1);
        let stale = order_with(signer, 1);
        assert!(registry.is_valid(signer, &stale));

        let epoch = registry.bump_global_nonce(signer, Side::Ask);
        assert_eq!(epoch, GlobalNonce(1));
        assert!(!registry.is_valid(signer, &stale), "snapshot 0 < epoch 1");

        let mut fresh = order_with(signer, 2);
        fresh.global_nonce = GlobalNonce(1);
        assert!(registry.is_valid(signer, &fresh), "snapshot == epoch");
        fresh.global_nonce = GlobalNonce(5);
        assert!(registry.is_valid(signer, &fresh), "snapshot > epoch");
    }

    #[test]
    fn global_bump_is_per_side() {
        let mut registry = NonceRegistry::new();
        let signer = Address::dummy(1);
        registry.bump_global_nonce(signer, Side::Ask);

        let mut bid = order_with(signer, 1);
        bid.side = Side::Bid;
        assert!(registry.is_valid(signer, &bid), "bid epoch untouched");
        assert_eq!(registry.global_nonce(signer, Side::Ask), GlobalNonce(1));
        assert_eq!(registry.global_nonce(signer, Side::Bid), GlobalNonce(0));
    }

    #[test]
    fn subset_cancellation() {
        let mut registry = NonceRegistry::new();
        let signer = Address::dummy(1);
        let mut order = order_with(signer, 1);
        order.subset_nonce = SubsetNonce(9);

        registry.cancel_subset_nonces(signer, &[SubsetNonce(9), SubsetNonce(10)]);
        assert!(!registry.is_valid(signer, &order));

        order.subset_nonce = SubsetNonce(11);
        assert!(registry.is_valid(signer, &order));
    }

    #[test]
    fn order_nonce_cancellation_spares_executed() {
        let mut registry = NonceRegistry::new();
        let signer = Address::dummy(1);
        registry.consume(signer, OrderNonce(1)).unwrap();

        registry.cancel_order_nonces(signer, &[OrderNonce(1), OrderNonce(2)]);
        assert_eq!(
            registry.execution_status(signer, OrderNonce(1)),
            ExecutionStatus::Executed
        );
        assert_eq!(
            registry.execution_status(signer, OrderNonce(2)),
            ExecutionStatus::Invalidated
        );
        assert!(!registry.is_valid(signer, &order_with(signer, 2)));
    }

    #[test]
    fn rollback_restores_consumed_nonces() {
        let mut registry = NonceRegistry::new();
        let signer = Address::dummy(1);

        registry.consume(signer, OrderNonce(1)).unwrap();
        let mark = registry.checkpoint();
        registry.consume(signer, OrderNonce(2)).unwrap();
        registry.consume(signer, OrderNonce(3)).unwrap();

        registry.rollback_to(mark);
        assert_eq!(
            registry.execution_status(signer, OrderNonce(1)),
            ExecutionStatus::Executed,
            "consumed before the mark stays consumed"
        );
        assert_eq!(
            registry.execution_status(signer, OrderNonce(2)),
            ExecutionStatus::Unused
        );
        assert_eq!(
            registry.execution_status(signer, OrderNonce(3)),
            ExecutionStatus::Unused
        );
    }

    #[test]
    fn rollback_does_not_touch_cancellations() {
        let mut registry = NonceRegistry::new();
        let signer = Address::dummy(1);
        let mark = registry.checkpoint();
        registry.cancel_order_nonces(signer, &[OrderNonce(7)]);
        registry.rollback_to(mark);
        assert_eq!(
            registry.execution_status(signer, OrderNonce(7)),
            ExecutionStatus::Invalidated,
            "signer cancellations are not journalled"
        );
    }

    #[test]
    fn nonce_state_serde_roundtrip() {
        let mut registry = NonceRegistry::new();
        let signer = Address::dummy(1);
        registry.consume(signer, OrderNonce(1)).unwrap();
        registry.cancel_subset_nonces(signer, &[SubsetNonce(5)]);

        let state = registry.states.get(&signer).unwrap();
        let json = serde_json::to_string(state).unwrap();
        let back: NonceState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cancelled_subsets, state.cancelled_subsets);
        assert_eq!(back.order_nonces.len(), 1);
    }
}
