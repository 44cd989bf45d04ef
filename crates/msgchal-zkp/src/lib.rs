//! # msgchal-zkp: Proof System Seam
//!
//! The contract's transitions are certified by proofs, but the proof system
//! itself is an external collaborator. This crate fixes the interface:
//!
//! - [`ProofSystem`] (sealed): compile a circuit once into a proving and a
//!   verifying key, prove a statement's public inputs, verify a proof.
//! - [`CircuitDescriptor`]: the identity of one transition circuit (method
//!   name plus the deployment parameters baked into it). Its canonical digest
//!   is what the keys bind to.
//! - [`MockProofSystem`]: deterministic, transparent SHA-256 "proofs" with no
//!   zero-knowledge guarantee, used by the local ledger and the tests.

pub mod circuit;
#[cfg(feature = "mock")]
pub mod mock;
pub mod traits;

pub use circuit::CircuitDescriptor;
#[cfg(feature = "mock")]
pub use mock::{MockProof, MockProofSystem, MockProvingKey, MockVerifyingKey};
pub use traits::{ProofError, ProofSystem, VerifyError};
