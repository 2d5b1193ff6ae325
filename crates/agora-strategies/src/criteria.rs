//! Merkle item-set criteria for restricted collection offers.
//!
//! Hashing is sorted-pair: a parent hashes `(min, max)` of its two
//! children, so proofs carry no left/right position flags. Leaves and
//! interior nodes use distinct domain prefixes. Odd nodes at any level are
//! promoted unchanged, which on the proof side simply means that level
//! contributes no sibling.
//!
//! Makers build the tree off-band when signing a criteria offer and embed
//! the root in `additional_parameters`; the engine only ever verifies
//! proofs.

use agora_types::{Address, ItemId};
use sha2::{Digest, Sha256};

const LEAF_PREFIX: &[u8] = b"agora:criteria:leaf:v1:";
const NODE_PREFIX: &[u8] = b"agora:criteria:node:v1:";

/// Hash of one `(collection, item)` leaf.
#[must_use]
pub fn leaf_hash(collection: Address, item_id: ItemId) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(LEAF_PREFIX);
    hasher.update(collection.0);
    hasher.update(item_id.0.to_le_bytes());
    hasher.finalize().into()
}

fn node_hash(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Sha256::new();
    hasher.update(NODE_PREFIX);
    hasher.update(lo);
    hasher.update(hi);
    hasher.finalize().into()
}

/// Verify a sorted-pair inclusion proof of `leaf` against `root`.
#[must_use]
pub fn verify_proof(leaf: &[u8; 32], proof: &[[u8; 32]], root: &[u8; 32]) -> bool {
    let mut acc = *leaf;
    for node in proof {
        acc = node_hash(&acc, node);
    }
    acc == *root
}

/// Merkle tree over criteria leaves, kept level by level so proofs can be
/// extracted for any leaf index.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// `levels[0]` is the leaf level; the last level has length 1.
    levels: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    /// Build from precomputed leaf hashes.
    #[must_use]
    pub fn build(leaves: Vec<[u8; 32]>) -> Self {
        let mut levels = Vec::new();
        let mut current = leaves;
        while current.len() > 1 {
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                if let [a, b] = pair {
                    next.push(node_hash(a, b));
                } else {
                    next.push(pair[0]);
                }
            }
            levels.push(current);
            current = next;
        }
        levels.push(current);
        Self { levels }
    }

    /// Build over `(collection, item)` leaves in the given order.
    #[must_use]
    pub fn from_items(collection: Address, item_ids: &[ItemId]) -> Self {
        Self::build(
            item_ids
                .iter()
                .map(|item_id| leaf_hash(collection, *item_id))
                .collect(),
        )
    }

    /// Root hash, or `None` for an empty tree.
    #[must_use]
    pub fn root(&self) -> Option<[u8; 32]> {
        self.levels.last().and_then(|level| level.first()).copied()
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Inclusion proof for the leaf at `index`, or `None` when out of
    /// range. Levels where the node has no sibling contribute nothing.
    #[must_use]
    pub fn proof(&self, index: usize) -> Option<Vec<[u8; 32]>> {
        if index >= self.leaf_count() {
            return None;
        }
        let mut proof = Vec::new();
        let mut idx = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = idx ^ 1;
            if sibling < level.len() {
                proof.push(level[sibling]);
            }
            idx /= 2;
        }
        Some(proof)
    }
}
