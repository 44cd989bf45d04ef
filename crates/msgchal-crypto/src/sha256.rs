//! # Domain-Separated SHA-256
//!
//! Every hash in the authenticated map carries a one-byte domain tag so a
//! leaf can never be confused with an interior node or an identity key:
//!
//! - Leaf: `SHA256(0x00 || value)`
//! - Node: `SHA256(0x01 || left || right)`
//! - Identity key: `SHA256(0x02 || public_key)`, reduced to [`MAP_DEPTH`] bits
//!
//! [`MAP_DEPTH`]: crate::smt::MAP_DEPTH

use msgchal_core::{Field, Hash256};
use sha2::{Digest, Sha256};

use crate::identity::Identity;
use crate::smt::MAP_DEPTH;

const LEAF_TAG: u8 = 0x00;
const NODE_TAG: u8 = 0x01;
const IDENTITY_TAG: u8 = 0x02;

fn tagged(tag: u8, parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([tag]);
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Hash of a leaf holding `value`.
pub fn leaf_hash(value: &Field) -> Hash256 {
    Hash256(tagged(LEAF_TAG, &[value.as_bytes()]))
}

/// Hash of an interior node.
pub fn node_hash(left: &Hash256, right: &Hash256) -> Hash256 {
    Hash256(tagged(NODE_TAG, &[left.as_bytes(), right.as_bytes()]))
}

/// Map key of an identity. The same key addresses the identity's slot in
/// both the address map and the message map.
pub fn hash_identity(identity: &Identity) -> Field {
    let digest = tagged(IDENTITY_TAG, &[identity.as_bytes()]);
    Field::from_be_bytes_truncated(digest, MAP_DEPTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::KeyPair;

    #[test]
    fn leaf_and_node_domains_differ() {
        // A node over two zero hashes must not equal a leaf over a zero word.
        let zero = Hash256::default();
        assert_ne!(node_hash(&zero, &zero), leaf_hash(&Field::ZERO));
    }

    #[test]
    fn node_hash_is_order_sensitive() {
        let a = leaf_hash(&Field::ZERO);
        let b = leaf_hash(&Field::ONE);
        assert_ne!(node_hash(&a, &b), node_hash(&b, &a));
    }

    #[test]
    fn identity_key_fits_the_tree() {
        let id = KeyPair::from_seed(&[7u8; 32]).identity();
        let key = hash_identity(&id);
        assert!(!key.bit(MAP_DEPTH));
        assert_eq!(key, hash_identity(&id));
    }

    #[test]
    fn distinct_identities_distinct_keys() {
        let a = KeyPair::from_seed(&[1u8; 32]).identity();
        let b = KeyPair::from_seed(&[2u8; 32]).identity();
        assert_ne!(hash_identity(&a), hash_identity(&b));
    }
}
