//! # Circuit Descriptors
//!
//! A descriptor names one transition circuit and the parameters compiled
//! into it. Two deployments with different address capacities produce
//! different descriptors, hence different keys, hence proofs that do not
//! cross over.

use msgchal_core::{CanonicalBytes, CanonicalizationError, Hash256};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identity of a transition circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitDescriptor {
    /// Circuit (method) name, e.g. `"register_address"`.
    pub name: String,
    /// Circuit format version.
    pub version: u32,
    /// Parameters compiled into the circuit.
    pub parameters: serde_json::Value,
}

impl CircuitDescriptor {
    /// Current descriptor format version.
    pub const VERSION: u32 = 1;

    /// Build a descriptor at the current version.
    pub fn new(name: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            version: Self::VERSION,
            parameters,
        }
    }

    /// SHA-256 over the canonical JSON of the descriptor.
    pub fn digest(&self) -> Result<Hash256, CanonicalizationError> {
        let canonical = CanonicalBytes::new(self)?;
        Ok(Hash256(Sha256::digest(canonical.as_bytes()).into()))
    }
}
