//! # Mock Proof System
//!
//! A deterministic, transparent proof system for local ledgers and tests.
//!
//! ## How It Works
//!
//! - `compile()` digests the canonical circuit descriptor; both keys carry
//!   that digest.
//! - `prove()` returns `SHA256(circuit_digest || public_inputs)` as hex.
//! - `verify()` recomputes the same digest from the verifying key and the
//!   public inputs and checks equality.
//!
//! Private inputs are ignored: the prover is trusted to have run the
//! transition before calling `prove()`.
//!
//! ## Security Warning
//!
//! **NOT PRIVATE AND NOT SOUND.** Anyone can compute a valid mock proof for
//! any statement. It binds a proof to a circuit and a statement, nothing more.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use msgchal_core::{hex, Hash256};

use crate::circuit::CircuitDescriptor;
use crate::traits::{ProofError, ProofSystem, VerifyError};

/// A mock proof: hex SHA-256 of the circuit digest and the public inputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MockProof {
    /// 64 lowercase hex characters.
    pub proof_hex: String,
}

/// Mock proving key, bound to one compiled circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProvingKey {
    /// Digest of the canonical circuit descriptor.
    pub circuit_digest: Hash256,
}

/// Mock verifying key, bound to one compiled circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockVerifyingKey {
    /// Digest of the canonical circuit descriptor.
    pub circuit_digest: Hash256,
}

/// Deterministic mock proof system.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockProofSystem;

fn mock_digest(circuit_digest: &Hash256, public_inputs: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(circuit_digest.as_bytes());
    hasher.update(public_inputs);
    hex::encode(&hasher.finalize())
}

impl ProofSystem for MockProofSystem {
    type Proof = MockProof;
    type VerifyingKey = MockVerifyingKey;
    type ProvingKey = MockProvingKey;

    fn compile(
        &self,
        circuit: &CircuitDescriptor,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey), ProofError> {
        let circuit_digest = circuit
            .digest()
            .map_err(|e| ProofError::CompilationFailed(format!("{}: {e}", circuit.name)))?;
        Ok((
            MockProvingKey { circuit_digest },
            MockVerifyingKey { circuit_digest },
        ))
    }

    fn prove(
        &self,
        pk: &Self::ProvingKey,
        public_inputs: &[u8],
        _private_inputs: &[u8],
    ) -> Result<Self::Proof, ProofError> {
        if public_inputs.is_empty() {
            return Err(ProofError::InvalidInputs(
                "public inputs must not be empty".to_string(),
            ));
        }
        Ok(MockProof {
            proof_hex: mock_digest(&pk.circuit_digest, public_inputs),
        })
    }

    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[u8],
    ) -> Result<bool, VerifyError> {
        if proof.proof_hex.len() != 64 {
            return Err(VerifyError::MalformedProof(format!(
                "expected 64 hex chars, got {}",
                proof.proof_hex.len()
            )));
        }
        if !proof.proof_hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(VerifyError::MalformedProof(
                "proof_hex contains non-hex characters".to_string(),
            ));
        }
        let expected = mock_digest(&vk.circuit_digest, public_inputs);
        Ok(proof.proof_hex.eq_ignore_ascii_case(&expected))
    }
}
