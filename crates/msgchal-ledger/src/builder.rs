//! # Transaction Builder
//!
//! Client-side prover. Each method runs the transition engine against a
//! ledger snapshot, so a transaction that would fail the circuit fails here
//! first with the same [`TransitionError`](msgchal_contract::TransitionError).
//! The resulting statement is proved with the method's proving key and
//! signed by the sender when the method requires it.

use msgchal_contract::{self as contract, Caller, ContractState, TransitionOutcome};
use msgchal_core::{CanonicalBytes, ContractConfig, Field};
use msgchal_crypto::{Identity, KeyPair, MembershipWitness};
use msgchal_zkp::ProofSystem;
use serde::Serialize;

use crate::circuits::TransitionCircuits;
use crate::error::LedgerError;
use crate::statement::{Transaction, TransitionStatement};

/// Witness data that never leaves the prover.
#[derive(Serialize)]
struct PrivateInputs<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    identity: Option<&'a Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a Field>,
    witnesses: Vec<&'a MembershipWitness>,
}

impl PrivateInputs<'_> {
    fn none() -> Self {
        Self {
            identity: None,
            message: None,
            witnesses: Vec::new(),
        }
    }
}

/// Builds proven, signed transactions for one contract configuration.
pub struct TransactionBuilder<P: ProofSystem> {
    system: P,
    config: ContractConfig,
    circuits: TransitionCircuits<P>,
}

impl<P: ProofSystem> TransactionBuilder<P> {
    /// Compile the four circuits for `config`.
    pub fn new(system: P, config: ContractConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        let circuits = TransitionCircuits::compile(&system, &config)?;
        Ok(Self {
            system,
            config,
            circuits,
        })
    }

    /// Configuration the circuits were compiled with.
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// `signer` initializes the contract and becomes admin.
    pub fn initialize(&self, signer: &KeyPair) -> Result<Transaction<P::Proof>, LedgerError> {
        let outcome = contract::initialize(&Caller::signed(signer.identity()))?;
        self.finish(outcome, &PrivateInputs::none(), Some(signer))
    }

    /// `admin` registers `identity`; `witness` is the identity's current
    /// address slot.
    pub fn register_address(
        &self,
        state: &ContractState,
        admin: &KeyPair,
        identity: &Identity,
        witness: &MembershipWitness,
    ) -> Result<Transaction<P::Proof>, LedgerError> {
        let outcome = contract::register_address(
            state,
            &Caller::signed(admin.identity()),
            &self.config,
            identity,
            witness,
        )?;
        let private = PrivateInputs {
            identity: Some(identity),
            message: None,
            witnesses: vec![witness],
        };
        self.finish(outcome, &private, Some(admin))
    }

    /// `sender` deposits `message`.
    pub fn deposit_message(
        &self,
        state: &ContractState,
        sender: &KeyPair,
        message: &Field,
        message_witness: &MembershipWitness,
        address_witness: &MembershipWitness,
    ) -> Result<Transaction<P::Proof>, LedgerError> {
        let outcome = contract::deposit_message(
            state,
            &Caller::signed(sender.identity()),
            message,
            message_witness,
            address_witness,
        )?;
        let private = PrivateInputs {
            identity: None,
            message: Some(message),
            witnesses: vec![message_witness, address_witness],
        };
        self.finish(outcome, &private, Some(sender))
    }

    /// Unsigned proof that `identity`'s message equals `message`.
    pub fn check_message(
        &self,
        state: &ContractState,
        identity: &Identity,
        message: &Field,
        witness: &MembershipWitness,
    ) -> Result<Transaction<P::Proof>, LedgerError> {
        let outcome = contract::check_message(state, identity, message, witness)?;
        let private = PrivateInputs {
            identity: Some(identity),
            message: Some(message),
            witnesses: vec![witness],
        };
        self.finish(outcome, &private, None)
    }

    fn finish(
        &self,
        outcome: TransitionOutcome,
        private: &PrivateInputs<'_>,
        signer: Option<&KeyPair>,
    ) -> Result<Transaction<P::Proof>, LedgerError> {
        let method = outcome.method;
        let statement = TransitionStatement::from(outcome);
        let public_inputs = statement.canonical_bytes()?;
        let private_inputs = CanonicalBytes::new(private)?;
        let pk = self.circuits.proving_key(method).ok_or_else(|| {
            LedgerError::MalformedStatement {
                method,
                reason: "no circuit compiled for method".to_string(),
            }
        })?;
        let proof = self
            .system
            .prove(pk, public_inputs.as_bytes(), private_inputs.as_bytes())?;
        let signature = match (method.requires_signature(), signer) {
            (true, Some(signer)) => Some(signer.sign(&public_inputs)),
            (true, None) => return Err(contract::TransitionError::MissingSignature.into()),
            (false, _) => None,
        };
        tracing::debug!(%method, "transaction built");
        Ok(Transaction {
            statement,
            proof,
            signature,
        })
    }
}

impl<P: ProofSystem> std::fmt::Debug for TransactionBuilder<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionBuilder")
            .field("config", &self.config)
            .field("circuits", &self.circuits)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::MirrorClient;
    use msgchal_contract::{ErrorKind, Method, TransitionError};
    use msgchal_zkp::MockProofSystem;

    fn builder() -> TransactionBuilder<MockProofSystem> {
        TransactionBuilder::new(MockProofSystem, ContractConfig::default()).unwrap()
    }

    #[test]
    fn initialize_is_signed_by_admin() {
        let admin = KeyPair::from_seed(&[1u8; 32]);
        let tx = builder().initialize(&admin).unwrap();
        assert_eq!(tx.method(), Method::Initialize);
        assert_eq!(tx.statement.sender, Some(admin.identity()));
        assert!(tx.signature.is_some());
    }

    #[test]
    fn engine_failures_surface_before_proving() {
        let admin = KeyPair::from_seed(&[1u8; 32]);
        let intruder = KeyPair::from_seed(&[2u8; 32]);
        let state = ContractState::genesis(admin.identity());
        let id = intruder.identity();
        let err = builder()
            .register_address(&state, &intruder, &id, &MirrorClient::new().address_witness(&id))
            .unwrap_err();
        match err {
            LedgerError::Transition(e) => assert_eq!(e.kind(), ErrorKind::Authorization),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn check_message_is_unsigned() {
        let admin = KeyPair::from_seed(&[1u8; 32]);
        let user = KeyPair::from_seed(&[2u8; 32]);
        let b = builder();
        let mut mirror = MirrorClient::new();
        let mut state = ContractState::genesis(admin.identity());
        let id = user.identity();

        let tx = b
            .register_address(&state, &admin, &id, &mirror.address_witness(&id))
            .unwrap();
        state = tx.statement.update.apply_to(&state);
        mirror.record_registration(&id);

        let message = Field::from_u64(99);
        let tx = b
            .deposit_message(
                &state,
                &user,
                &message,
                &mirror.message_witness(&id),
                &mirror.address_witness(&id),
            )
            .unwrap();
        state = tx.statement.update.apply_to(&state);
        mirror.record_message(&id, message);

        let tx = b
            .check_message(&state, &id, &message, &mirror.message_witness(&id))
            .unwrap();
        assert!(tx.signature.is_none());
        assert!(tx.statement.sender.is_none());
        assert_eq!(tx.statement.returned, Some(true));

        let err = b
            .check_message(&state, &id, &Field::from_u64(98), &mirror.message_witness(&id))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Transition(TransitionError::StaleWitness { .. })
        ));
    }

    #[test]
    fn statement_hides_private_inputs() {
        let admin = KeyPair::from_seed(&[1u8; 32]);
        let user = KeyPair::from_seed(&[2u8; 32]);
        let state = ContractState::genesis(admin.identity());
        let id = user.identity();
        let tx = builder()
            .register_address(&state, &admin, &id, &MirrorClient::new().address_witness(&id))
            .unwrap();
        let json = serde_json::to_string(&tx.statement).unwrap();
        assert!(!json.contains(&id.to_hex()));
        assert!(!json.contains("siblings"));
    }
}
