//! # Transition Circuits
//!
//! One circuit per contract method. Each descriptor bakes in the
//! deployment's address capacity and the map depth, so a proof built for one
//! configuration never verifies on a ledger deployed with another.

use std::collections::BTreeMap;

use msgchal_contract::Method;
use msgchal_core::ContractConfig;
use msgchal_crypto::MAP_DEPTH;
use msgchal_zkp::{CircuitDescriptor, ProofSystem};
use serde_json::json;

/// The descriptor of `method`'s circuit under `config`.
pub fn descriptor(method: Method, config: &ContractConfig) -> CircuitDescriptor {
    CircuitDescriptor::new(
        method.as_str(),
        json!({
            "address_capacity": config.address_capacity,
            "map_depth": MAP_DEPTH,
        }),
    )
}

/// Compiled keys for all four methods.
pub struct TransitionCircuits<P: ProofSystem> {
    keys: BTreeMap<Method, (P::ProvingKey, P::VerifyingKey)>,
}

impl<P: ProofSystem> TransitionCircuits<P> {
    /// Compile every method's circuit once.
    pub fn compile(system: &P, config: &ContractConfig) -> Result<Self, msgchal_zkp::ProofError> {
        let mut keys = BTreeMap::new();
        for method in Method::ALL {
            let compiled = system.compile(&descriptor(method, config))?;
            keys.insert(method, compiled);
        }
        tracing::debug!(
            capacity = config.address_capacity,
            circuits = keys.len(),
            "transition circuits compiled"
        );
        Ok(Self { keys })
    }

    /// Proving key for `method`.
    pub fn proving_key(&self, method: Method) -> Option<&P::ProvingKey> {
        self.keys.get(&method).map(|(pk, _)| pk)
    }

    /// Verifying key for `method`.
    pub fn verifying_key(&self, method: Method) -> Option<&P::VerifyingKey> {
        self.keys.get(&method).map(|(_, vk)| vk)
    }
}

impl<P: ProofSystem> Clone for TransitionCircuits<P> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
        }
    }
}

impl<P: ProofSystem> std::fmt::Debug for TransitionCircuits<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionCircuits")
            .field("methods", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}
