//! # Off-chain Map Mirror
//!
//! The contract stores only the two map roots. A client keeps the full
//! leaf sets here, reads witnesses from them before building a transaction,
//! and records the leaf write once the ledger has committed it.

use msgchal_contract::{ContractState, REGISTERED, UNSET};
use msgchal_core::Field;
use msgchal_crypto::{AuthenticatedMapClient, Identity, MembershipWitness, MerkleMap};

/// Full copies of the address map and the message map.
#[derive(Debug, Clone, Default)]
pub struct MirrorClient<M = MerkleMap> {
    addresses: M,
    messages: M,
}

impl MirrorClient<MerkleMap> {
    /// Two empty in-memory maps.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: AuthenticatedMapClient> MirrorClient<M> {
    /// Mirror over caller-supplied map implementations.
    pub fn with_maps(addresses: M, messages: M) -> Self {
        Self {
            addresses,
            messages,
        }
    }

    /// Witness for `identity`'s slot in the address map.
    pub fn address_witness(&self, identity: &Identity) -> MembershipWitness {
        self.addresses.witness_for(&identity.map_key())
    }

    /// Witness for `identity`'s slot in the message map.
    pub fn message_witness(&self, identity: &Identity) -> MembershipWitness {
        self.messages.witness_for(&identity.map_key())
    }

    /// Whether `identity` is registered in the mirror.
    pub fn is_registered(&self, identity: &Identity) -> bool {
        self.addresses.get(&identity.map_key()) == REGISTERED
    }

    /// `identity`'s deposited message, if any.
    pub fn message_of(&self, identity: &Identity) -> Option<Field> {
        let message = self.messages.get(&identity.map_key());
        (message != UNSET).then_some(message)
    }

    /// Mark `identity` registered after the ledger committed it.
    pub fn record_registration(&mut self, identity: &Identity) {
        self.addresses.set(identity.map_key(), REGISTERED);
        tracing::debug!(identity = %identity, root = %self.addresses.root(), "mirror: registration recorded");
    }

    /// Store `identity`'s message after the ledger committed it.
    pub fn record_message(&mut self, identity: &Identity, message: Field) {
        self.messages.set(identity.map_key(), message);
        tracing::debug!(identity = %identity, root = %self.messages.root(), "mirror: message recorded");
    }

    /// Root of the mirrored address map.
    pub fn address_root(&self) -> msgchal_core::Hash256 {
        self.addresses.root()
    }

    /// Root of the mirrored message map.
    pub fn message_root(&self) -> msgchal_core::Hash256 {
        self.messages.root()
    }

    /// Whether both mirrored roots equal the committed roots.
    pub fn in_sync_with(&self, state: &ContractState) -> bool {
        self.address_root() == state.address_root && self.message_root() == state.message_root
    }
}
