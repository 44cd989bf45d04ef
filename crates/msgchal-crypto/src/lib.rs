//! # msgchal-crypto: Cryptographic Primitives
//!
//! - **Hashing** (`sha256.rs`): domain-separated SHA-256 for map leaves,
//!   map nodes and identity keys.
//! - **Identity** (`identity.rs`): Ed25519 identities, key pairs and
//!   signatures over `CanonicalBytes`.
//! - **Authenticated map** (`smt.rs`): a depth-254 sparse Merkle map, its
//!   `MembershipWitness`, and the `AuthenticatedMapClient` seam used by
//!   off-chain mirrors.
//!
//! ## Crate Policy
//!
//! - Depends only on `msgchal-core` internally.
//! - Tests use real SHA-256 and real Ed25519; nothing cryptographic is mocked.

pub mod identity;
pub mod sha256;
pub mod smt;

pub use identity::{verify_signature, Identity, KeyPair, Signature};
pub use sha256::{hash_identity, leaf_hash, node_hash};
pub use smt::{empty_root, AuthenticatedMapClient, MembershipWitness, MerkleMap, MAP_DEPTH};
