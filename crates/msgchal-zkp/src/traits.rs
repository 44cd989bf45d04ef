//! # Proof System Trait (Sealed)
//!
//! Only backends defined in this crate may implement [`ProofSystem`]. A
//! ledger that accepts state changes on the strength of a proof must not be
//! handed a backend from outside.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::circuit::CircuitDescriptor;

/// Error during circuit compilation or proof generation.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The circuit descriptor could not be compiled.
    #[error("circuit compilation failed: {0}")]
    CompilationFailed(String),
    /// The inputs do not belong to the circuit the key was compiled for.
    #[error("invalid circuit inputs: {0}")]
    InvalidInputs(String),
    /// Proof generation failed internally.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),
}

/// Error during proof verification.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The proof is structurally malformed.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    /// The proof is cryptographically invalid.
    #[error("proof verification failed: {0}")]
    VerificationFailed(String),
}

mod private {
    pub trait Sealed {}
}

/// Interface of a proof system.
///
/// Circuits are compiled once per deployment; the verifying key is handed
/// to the ledger and every later proof for that circuit is checked against
/// it.
pub trait ProofSystem: private::Sealed + Send + Sync {
    /// The proof artifact carried by a transaction.
    type Proof: Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync;
    /// Key used to verify proofs of one circuit.
    type VerifyingKey: Clone + std::fmt::Debug + Send + Sync;
    /// Key used to produce proofs of one circuit.
    type ProvingKey: Clone + Send + Sync;

    /// Compile a circuit into its key pair.
    ///
    /// # Errors
    ///
    /// Returns [`ProofError::CompilationFailed`] if the descriptor cannot be
    /// canonicalized.
    fn compile(
        &self,
        circuit: &CircuitDescriptor,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey), ProofError>;

    /// Prove that the prover knows private inputs satisfying the circuit for
    /// the given public inputs.
    fn prove(
        &self,
        pk: &Self::ProvingKey,
        public_inputs: &[u8],
        private_inputs: &[u8],
    ) -> Result<Self::Proof, ProofError>;

    /// Verify a proof against public inputs.
    ///
    /// `Ok(false)` means well-formed but invalid; `Err` means malformed.
    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[u8],
    ) -> Result<bool, VerifyError>;
}

#[cfg(feature = "mock")]
impl private::Sealed for crate::mock::MockProofSystem {}
