//! # Sparse Authenticated Map
//!
//! A key-value map over a fixed-depth binary Merkle tree, committed to a
//! single root. Every key below `2^MAP_DEPTH` has a leaf; keys that were
//! never written hold [`Field::ZERO`].
//!
//! ## Path layout
//!
//! The leaf for `key` sits at the position whose path from the leaf upward
//! is the bits of `key`, least significant first. At level `l` the running
//! node is a left child when bit `l` of the key is clear.
//!
//! ## Witnesses
//!
//! A [`MembershipWitness`] is the list of siblings along that path plus the
//! left/right flags. [`MembershipWitness::compute_root_and_key`] folds a
//! claimed leaf value up the path and returns the root the tree would have
//! and the key the path spells. The same witness serves both sides of a
//! write: fold the current value to check it against the committed root,
//! fold the new value to learn the next root. Siblings do not change when
//! only this leaf changes, so no other entry is revealed or needed.
//!
//! ## Mirrors
//!
//! The contract never holds a full tree. Clients keep one through the
//! [`AuthenticatedMapClient`] seam; [`MerkleMap`] is the in-memory
//! implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use msgchal_core::{Field, Hash256};
use serde::{Deserialize, Serialize};

use crate::sha256::{leaf_hash, node_hash};

/// Number of levels between a leaf and the root.
pub const MAP_DEPTH: usize = 254;

/// Hash of an all-empty subtree at each level; index 0 is the empty leaf,
/// index [`MAP_DEPTH`] the empty root.
fn empty_hashes() -> &'static [Hash256] {
    static EMPTY: OnceLock<Vec<Hash256>> = OnceLock::new();
    EMPTY.get_or_init(|| {
        let mut hashes = Vec::with_capacity(MAP_DEPTH + 1);
        let mut h = leaf_hash(&Field::ZERO);
        hashes.push(h);
        for _ in 0..MAP_DEPTH {
            h = node_hash(&h, &h);
            hashes.push(h);
        }
        hashes
    })
}

/// Root of a map in which no key has been written.
pub fn empty_root() -> Hash256 {
    empty_hashes()[MAP_DEPTH]
}

// ---------------------------------------------------------------------------
// Witness
// ---------------------------------------------------------------------------

/// Merkle path binding a key to a leaf position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipWitness {
    /// `is_left[l]` is true when the running node at level `l` is a left child.
    is_left: Vec<bool>,
    /// `siblings[l]` is the sibling hash at level `l`, leaf level first.
    siblings: Vec<Hash256>,
}

impl MembershipWitness {
    /// Assemble a witness from its path flags and sibling hashes. Lengths
    /// are not checked; a short or mismatched path simply folds to a root
    /// no honest map has.
    pub fn new(is_left: Vec<bool>, siblings: Vec<Hash256>) -> Self {
        Self { is_left, siblings }
    }

    /// Number of levels the witness folds over.
    pub fn depth(&self) -> usize {
        self.is_left.len().min(self.siblings.len())
    }

    /// Fold `value` up the path. Returns the root the map would have if the
    /// witnessed key held `value`, and the key the path spells.
    ///
    /// Pure: the same witness and value always give the same pair.
    pub fn compute_root_and_key(&self, value: &Field) -> (Hash256, Field) {
        let mut node = leaf_hash(value);
        let mut key = Field::ZERO;
        for (level, (&is_left, sibling)) in self.is_left.iter().zip(&self.siblings).enumerate() {
            if is_left {
                node = node_hash(&node, sibling);
            } else {
                node = node_hash(sibling, &node);
                key = key.with_bit(level, true);
            }
        }
        (node, key)
    }

    /// The root half of [`compute_root_and_key`](Self::compute_root_and_key).
    pub fn compute_root(&self, value: &Field) -> Hash256 {
        self.compute_root_and_key(value).0
    }

    /// The key the path spells, independent of any leaf value.
    pub fn key(&self) -> Field {
        self.is_left
            .iter()
            .take(self.depth())
            .enumerate()
            .fold(Field::ZERO, |key, (level, &is_left)| {
                key.with_bit(level, !is_left)
            })
    }
}

// ---------------------------------------------------------------------------
// Mirror seam
// ---------------------------------------------------------------------------

/// Off-chain full copy of an authenticated map.
///
/// Callers keep one per map to produce witnesses; the contract only ever
/// sees roots and witnesses.
pub trait AuthenticatedMapClient {
    /// Current value at `key` ([`Field::ZERO`] when never written).
    fn get(&self, key: &Field) -> Field;

    /// Write `value` at `key`, updating the root.
    fn set(&mut self, key: Field, value: Field);

    /// Witness for `key` against the current root.
    fn witness_for(&self, key: &Field) -> MembershipWitness;

    /// Current root.
    fn root(&self) -> Hash256;
}

// ---------------------------------------------------------------------------
// In-memory map
// ---------------------------------------------------------------------------

/// In-memory sparse Merkle map.
///
/// Stores only non-empty subtrees: a node is kept under `(level, prefix)`
/// where `prefix` is the key with its lowest `level` bits cleared. Anything
/// missing is the empty subtree hash for that level.
#[derive(Debug, Clone, Default)]
pub struct MerkleMap {
    leaves: BTreeMap<Field, Field>,
    nodes: HashMap<(usize, Field), Hash256>,
}

impl MerkleMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys holding a non-zero value.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether no key holds a non-zero value.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Iterate over keys holding a non-zero value, in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&Field, &Field)> {
        self.leaves.iter()
    }

    fn node(&self, level: usize, prefix: &Field) -> Hash256 {
        self.nodes
            .get(&(level, *prefix))
            .copied()
            .unwrap_or(empty_hashes()[level])
    }

    fn store(&mut self, level: usize, prefix: Field, hash: Hash256) {
        if hash == empty_hashes()[level] {
            self.nodes.remove(&(level, prefix));
        } else {
            self.nodes.insert((level, prefix), hash);
        }
    }

    fn sibling_prefix(key: &Field, level: usize) -> Field {
        key.clear_low_bits(level).with_bit(level, !key.bit(level))
    }
}

impl AuthenticatedMapClient for MerkleMap {
    fn get(&self, key: &Field) -> Field {
        let key = key.truncate(MAP_DEPTH);
        self.leaves.get(&key).copied().unwrap_or(Field::ZERO)
    }

    fn set(&mut self, key: Field, value: Field) {
        let key = key.truncate(MAP_DEPTH);
        if value.is_zero() {
            self.leaves.remove(&key);
        } else {
            self.leaves.insert(key, value);
        }

        let mut node = leaf_hash(&value);
        self.store(0, key, node);
        for level in 0..MAP_DEPTH {
            let sibling = self.node(level, &Self::sibling_prefix(&key, level));
            node = if key.bit(level) {
                node_hash(&sibling, &node)
            } else {
                node_hash(&node, &sibling)
            };
            self.store(level + 1, key.clear_low_bits(level + 1), node);
        }
        tracing::trace!(key = %key, root = %node, "authenticated map leaf written");
    }

    fn witness_for(&self, key: &Field) -> MembershipWitness {
        let key = key.truncate(MAP_DEPTH);
        let mut is_left = Vec::with_capacity(MAP_DEPTH);
        let mut siblings = Vec::with_capacity(MAP_DEPTH);
        for level in 0..MAP_DEPTH {
            is_left.push(!key.bit(level));
            siblings.push(self.node(level, &Self::sibling_prefix(&key, level)));
        }
        MembershipWitness::new(is_left, siblings)
    }

    fn root(&self) -> Hash256 {
        self.node(MAP_DEPTH, &Field::ZERO)
    }
}
