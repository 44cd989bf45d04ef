//! # Local Ledger
//!
//! An in-memory ledger hosting one contract. All transactions are serialized
//! through a single lock, so every precondition is checked against the
//! latest commit and a transaction's writes land together.
//!
//! ## Acceptance
//!
//! 1. Signed methods: the statement names a sender and carries that
//!    sender's signature over the canonical statement.
//! 2. The proof verifies under the method's compiled circuit.
//! 3. Lifecycle: `initialize` only on an empty ledger, everything else
//!    only after it.
//! 4. The statement reads and writes exactly the method's fields, and the
//!    method rules that are visible in it hold (see `rules.rs`).
//! 5. Every precondition equals the committed value.
//!
//! `check_message` is read-only: it is verified under the same lock but
//! never advances the sequence. Anything rejected leaves the committed
//! state untouched. Two transactions
//! built from the same snapshot cannot both commit if either writes a field
//! the other read.

use msgchal_contract::{ContractState, FieldValue, Method, StateField, TransitionError};
use msgchal_core::ContractConfig;
use msgchal_crypto::verify_signature;
use msgchal_zkp::ProofSystem;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::circuits::TransitionCircuits;
use crate::error::LedgerError;
use crate::rules;
use crate::statement::Transaction;

/// Acknowledgement of an accepted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Position of the transaction in the ledger's commit order, from 1.
    /// For a read-only method, the commit it was checked against.
    pub sequence: u64,
    /// Accepted method.
    pub method: Method,
    /// Whether the transaction wrote state. `check_message` never does.
    pub committed: bool,
    /// The method's return value, set by the ledger once the call is
    /// accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned: Option<bool>,
}

#[derive(Debug, Default)]
struct Committed {
    state: Option<ContractState>,
    sequence: u64,
}

/// A proof-gated, single-contract ledger.
pub struct LocalLedger<P: ProofSystem> {
    system: P,
    config: ContractConfig,
    circuits: TransitionCircuits<P>,
    committed: Mutex<Committed>,
}

impl<P: ProofSystem> LocalLedger<P> {
    /// Deploy an uninitialized contract: validate `config` and compile the
    /// four method circuits.
    pub fn deploy(system: P, config: ContractConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        let circuits = TransitionCircuits::compile(&system, &config)?;
        tracing::info!(capacity = config.address_capacity, "contract deployed");
        Ok(Self {
            system,
            config,
            circuits,
            committed: Mutex::new(Committed::default()),
        })
    }

    /// Configuration the circuits were compiled with.
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Snapshot of the committed state, if initialized.
    pub fn state(&self) -> Option<ContractState> {
        self.committed.lock().state.clone()
    }

    /// Number of committed transactions.
    pub fn sequence(&self) -> u64 {
        self.committed.lock().sequence
    }

    /// Latest committed value of one field.
    pub fn get_field(&self, field: StateField) -> Option<FieldValue> {
        self.committed.lock().state.as_ref().map(|s| s.get(field))
    }

    /// Fields change only through proven transitions.
    pub fn set_field(&self, field: StateField, value: FieldValue) -> Result<(), LedgerError> {
        tracing::warn!(%field, %value, "direct field write denied");
        Err(LedgerError::PermissionDenied(field))
    }

    /// Verify and commit `tx`, or reject it with no effect.
    pub fn submit(&self, tx: &Transaction<P::Proof>) -> Result<Receipt, LedgerError> {
        let method = tx.statement.method;
        let result = self.try_commit(tx);
        match &result {
            Ok(receipt) => tracing::info!(
                %method,
                sequence = receipt.sequence,
                committed = receipt.committed,
                "transaction accepted"
            ),
            Err(e) => tracing::warn!(%method, error = %e, "transaction rejected"),
        }
        result
    }

    fn try_commit(&self, tx: &Transaction<P::Proof>) -> Result<Receipt, LedgerError> {
        let statement = &tx.statement;
        let method = statement.method;
        let public_inputs = statement.canonical_bytes()?;

        if method.requires_signature() {
            let sender = statement.sender.ok_or(LedgerError::MissingSender(method))?;
            let signature = tx
                .signature
                .as_ref()
                .ok_or(TransitionError::MissingSignature)?;
            verify_signature(&sender, &public_inputs, signature)?;
        }

        let vk = self.circuits.verifying_key(method).ok_or_else(|| {
            rules::malformed(method, "no circuit compiled for method".to_string())
        })?;
        if !self.system.verify(vk, &tx.proof, public_inputs.as_bytes())? {
            return Err(LedgerError::InvalidProof(method));
        }
        rules::check_shape(statement)?;

        let mut committed = self.committed.lock();
        let next = match (method, committed.state.as_ref()) {
            (Method::Initialize, Some(_)) => return Err(TransitionError::AlreadyInitialized.into()),
            (Method::Initialize, None) => rules::genesis(statement)?,
            (_, None) => return Err(TransitionError::NotInitialized.into()),
            (_, Some(current)) => {
                if let Some((field, expected, actual)) =
                    statement.preconditions.first_mismatch(current)
                {
                    return Err(LedgerError::StalePrecondition {
                        field,
                        expected,
                        actual,
                    });
                }
                rules::admit(statement, current, &self.config)?;
                if method.writes().is_empty() {
                    return Ok(Receipt {
                        sequence: committed.sequence,
                        method,
                        committed: false,
                        returned: Some(true),
                    });
                }
                statement.update.apply_to(current)
            }
        };

        committed.state = Some(next);
        committed.sequence += 1;
        Ok(Receipt {
            sequence: committed.sequence,
            method,
            committed: true,
            returned: None,
        })
    }
}

impl<P: ProofSystem> std::fmt::Debug for LocalLedger<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let committed = self.committed.lock();
        f.debug_struct("LocalLedger")
            .field("config", &self.config)
            .field("sequence", &committed.sequence)
            .field("state", &committed.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TransactionBuilder;
    use crate::mirror::MirrorClient;
    use crate::statement::TransitionStatement;
    use msgchal_contract::FieldSet;
    use msgchal_core::{Field, Hash256};
    use msgchal_crypto::{empty_root, KeyPair, Signature};
    use msgchal_zkp::{MockProof, MockProofSystem};

    struct Setup {
        ledger: LocalLedger<MockProofSystem>,
        builder: TransactionBuilder<MockProofSystem>,
        mirror: MirrorClient,
        admin: KeyPair,
    }

    fn setup() -> Setup {
        let config = ContractConfig::default();
        let ledger = LocalLedger::deploy(MockProofSystem, config).unwrap();
        let builder = TransactionBuilder::new(MockProofSystem, config).unwrap();
        let admin = KeyPair::from_seed(&[1u8; 32]);
        let tx = builder.initialize(&admin).unwrap();
        ledger.submit(&tx).unwrap();
        Setup {
            ledger,
            builder,
            mirror: MirrorClient::new(),
            admin,
        }
    }

    impl Setup {
        fn register(&mut self, user: &KeyPair) -> Result<Receipt, LedgerError> {
            let state = self.ledger.state().unwrap();
            let id = user.identity();
            let tx = self.builder.register_address(
                &state,
                &self.admin,
                &id,
                &self.mirror.address_witness(&id),
            )?;
            let receipt = self.ledger.submit(&tx)?;
            self.mirror.record_registration(&id);
            Ok(receipt)
        }
    }

    /// Prove and sign an arbitrary statement with the real circuit keys.
    fn forge(statement: TransitionStatement, signer: &KeyPair) -> Transaction<MockProof> {
        let circuits = TransitionCircuits::compile(&MockProofSystem, &ContractConfig::default()).unwrap();
        let bytes = statement.canonical_bytes().unwrap();
        let pk = circuits.proving_key(statement.method).unwrap();
        let proof = MockProofSystem.prove(pk, bytes.as_bytes(), b"").unwrap();
        Transaction {
            signature: Some(signer.sign(&bytes)),
            statement,
            proof,
        }
    }

    #[test]
    fn initialize_commits_genesis() {
        let s = setup();
        let state = s.ledger.state().unwrap();
        assert_eq!(state.admin_address, s.admin.identity());
        assert_eq!(state.address_root, empty_root());
        assert_eq!(s.ledger.sequence(), 1);
    }

    #[test]
    fn second_initialize_is_rejected() {
        let s = setup();
        let other = KeyPair::from_seed(&[9u8; 32]);
        let tx = s.builder.initialize(&other).unwrap();
        let err = s.ledger.submit(&tx).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Transition(TransitionError::AlreadyInitialized)
        ));
        assert_eq!(
            s.ledger.get_field(StateField::AdminAddress),
            Some(FieldValue::Identity(s.admin.identity()))
        );
    }

    #[test]
    fn transactions_before_initialize_are_rejected() {
        let config = ContractConfig::default();
        let ledger = LocalLedger::deploy(MockProofSystem, config).unwrap();
        let builder = TransactionBuilder::new(MockProofSystem, config).unwrap();
        let admin = KeyPair::from_seed(&[1u8; 32]);
        // Statement built against a state the ledger never committed.
        let phantom = ContractState::genesis(admin.identity());
        let user = KeyPair::from_seed(&[2u8; 32]).identity();
        let witness = MirrorClient::new().address_witness(&user);
        let tx = builder
            .register_address(&phantom, &admin, &user, &witness)
            .unwrap();
        assert!(matches!(
            ledger.submit(&tx),
            Err(LedgerError::Transition(TransitionError::NotInitialized))
        ));
        assert!(ledger.state().is_none());
    }

    #[test]
    fn direct_writes_are_denied() {
        let s = setup();
        let err = s
            .ledger
            .set_field(StateField::AddressCount, FieldValue::Count(50))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::PermissionDenied(StateField::AddressCount)
        ));
        assert_eq!(
            s.ledger.get_field(StateField::AddressCount),
            Some(FieldValue::Count(0))
        );
    }

    #[test]
    fn tampered_statement_fails_signature() {
        let mut s = setup();
        let user = KeyPair::from_seed(&[2u8; 32]);
        let state = s.ledger.state().unwrap();
        let id = user.identity();
        let mut tx = s
            .builder
            .register_address(&state, &s.admin, &id, &s.mirror.address_witness(&id))
            .unwrap();
        tx.statement.update.address_count = Some(40);
        assert!(matches!(s.ledger.submit(&tx), Err(LedgerError::Signature(_))));
        assert_eq!(s.ledger.state().unwrap(), state);
        s.register(&user).unwrap();
    }

    #[test]
    fn missing_signature_is_rejected() {
        let s = setup();
        let user = KeyPair::from_seed(&[2u8; 32]);
        let state = s.ledger.state().unwrap();
        let id = user.identity();
        let mut tx = s
            .builder
            .register_address(&state, &s.admin, &id, &s.mirror.address_witness(&id))
            .unwrap();
        tx.signature = None;
        assert!(matches!(
            s.ledger.submit(&tx),
            Err(LedgerError::Transition(TransitionError::MissingSignature))
        ));
    }

    #[test]
    fn forged_proof_is_rejected() {
        let s = setup();
        let user = KeyPair::from_seed(&[2u8; 32]);
        let state = s.ledger.state().unwrap();
        let id = user.identity();
        let mut tx = s
            .builder
            .register_address(&state, &s.admin, &id, &s.mirror.address_witness(&id))
            .unwrap();
        tx.proof = MockProof {
            proof_hex: "0".repeat(64),
        };
        assert!(matches!(
            s.ledger.submit(&tx),
            Err(LedgerError::InvalidProof(Method::RegisterAddress))
        ));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let s = setup();
        let user = KeyPair::from_seed(&[2u8; 32]);
        let state = s.ledger.state().unwrap();
        let id = user.identity();
        let mut tx = s
            .builder
            .register_address(&state, &s.admin, &id, &s.mirror.address_witness(&id))
            .unwrap();
        let bytes = tx.statement.canonical_bytes().unwrap();
        tx.signature = Some(user.sign(&bytes));
        assert!(matches!(s.ledger.submit(&tx), Err(LedgerError::Signature(_))));
        let garbage = Signature::from_bytes([0u8; 64]);
        tx.signature = Some(garbage);
        assert!(s.ledger.submit(&tx).is_err());
    }

    #[test]
    fn stale_snapshot_loses_the_race() {
        let mut s = setup();
        let (alice, bob) = (KeyPair::from_seed(&[2u8; 32]), KeyPair::from_seed(&[3u8; 32]));
        let snapshot = s.ledger.state().unwrap();
        let build = |who: &KeyPair| {
            let id = who.identity();
            s.builder
                .register_address(&snapshot, &s.admin, &id, &s.mirror.address_witness(&id))
                .unwrap()
        };
        let (tx_a, tx_b) = (build(&alice), build(&bob));

        s.ledger.submit(&tx_a).unwrap();
        let err = s.ledger.submit(&tx_b).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::StalePrecondition {
                field: StateField::AddressCount,
                ..
            }
        ));
        s.mirror.record_registration(&alice.identity());

        // Refreshed witness goes through.
        s.register(&bob).unwrap();
        assert_eq!(s.ledger.state().unwrap().address_count, 2);
    }

    #[test]
    fn concurrent_deposits_from_one_snapshot_commit_once() {
        let mut s = setup();
        let user = KeyPair::from_seed(&[2u8; 32]);
        s.register(&user).unwrap();
        let state = s.ledger.state().unwrap();
        let id = user.identity();
        let txs: Vec<_> = (1..=4u64)
            .map(|n| {
                s.builder
                    .deposit_message(
                        &state,
                        &user,
                        &Field::from_u64(n),
                        &s.mirror.message_witness(&id),
                        &s.mirror.address_witness(&id),
                    )
                    .unwrap()
            })
            .collect();

        let ledger = &s.ledger;
        let accepted = std::thread::scope(|scope| {
            let handles: Vec<_> = txs
                .iter()
                .map(|tx| scope.spawn(move || ledger.submit(tx).is_ok()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or(false))
                .filter(|ok| *ok)
                .count()
        });
        assert_eq!(accepted, 1);
        assert_eq!(s.ledger.state().unwrap().message_count, 1);
    }

    #[test]
    fn forged_register_cannot_take_over_admin() {
        let s = setup();
        let intruder = KeyPair::from_seed(&[6u8; 32]);
        let before = s.ledger.state().unwrap();
        let statement = TransitionStatement {
            method: Method::RegisterAddress,
            sender: Some(intruder.identity()),
            preconditions: FieldSet::default(),
            update: FieldSet {
                admin_address: Some(intruder.identity()),
                address_count: Some(5000),
                message_root: Some(Hash256([7u8; 32])),
                ..FieldSet::default()
            },
            returned: None,
        };
        let err = s.ledger.submit(&forge(statement, &intruder)).unwrap_err();
        assert!(matches!(err, LedgerError::MalformedStatement { .. }), "{err}");
        assert_eq!(s.ledger.state().unwrap(), before);
        assert_eq!(s.ledger.sequence(), 1);
    }

    #[test]
    fn well_shaped_register_from_non_admin_is_unauthorized() {
        let s = setup();
        let intruder = KeyPair::from_seed(&[6u8; 32]);
        let before = s.ledger.state().unwrap();
        let statement = TransitionStatement {
            method: Method::RegisterAddress,
            sender: Some(intruder.identity()),
            preconditions: FieldSet::read(&before, Method::RegisterAddress.reads()),
            update: FieldSet {
                address_count: Some(1),
                address_root: Some(before.address_root),
                ..FieldSet::default()
            },
            returned: None,
        };
        let err = s.ledger.submit(&forge(statement, &intruder)).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Transition(TransitionError::Unauthorized { .. })
        ));
        assert_eq!(s.ledger.state().unwrap(), before);
    }

    #[test]
    fn admin_cannot_jump_the_address_count() {
        let s = setup();
        let before = s.ledger.state().unwrap();
        let statement = TransitionStatement {
            method: Method::RegisterAddress,
            sender: Some(s.admin.identity()),
            preconditions: FieldSet::read(&before, Method::RegisterAddress.reads()),
            update: FieldSet {
                address_count: Some(0),
                address_root: Some(before.address_root),
                ..FieldSet::default()
            },
            returned: None,
        };
        let err = s.ledger.submit(&forge(statement, &s.admin)).unwrap_err();
        assert!(matches!(err, LedgerError::MalformedStatement { .. }), "{err}");
        assert_eq!(s.ledger.state().unwrap(), before);
    }

    #[test]
    fn check_message_is_read_only() {
        let mut s = setup();
        let user = KeyPair::from_seed(&[2u8; 32]);
        s.register(&user).unwrap();
        let id = user.identity();
        let message = Field::from_u64(3);
        let state = s.ledger.state().unwrap();
        let tx = s
            .builder
            .deposit_message(
                &state,
                &user,
                &message,
                &s.mirror.message_witness(&id),
                &s.mirror.address_witness(&id),
            )
            .unwrap();
        s.ledger.submit(&tx).unwrap();
        s.mirror.record_message(&id, message);
        let state = s.ledger.state().unwrap();

        let tx = s
            .builder
            .check_message(&state, &id, &message, &s.mirror.message_witness(&id))
            .unwrap();
        let receipt = s.ledger.submit(&tx).unwrap();
        assert!(!receipt.committed);
        assert_eq!(receipt.returned, Some(true));
        assert_eq!(receipt.sequence, 3);
        assert_eq!(s.ledger.sequence(), 3);
        assert_eq!(s.ledger.state().unwrap(), state);
    }

    #[test]
    fn check_message_with_forged_return_is_rejected() {
        let s = setup();
        let state = s.ledger.state().unwrap();
        let statement = TransitionStatement {
            method: Method::CheckMessage,
            sender: None,
            preconditions: FieldSet::read(&state, Method::CheckMessage.reads()),
            update: FieldSet::default(),
            returned: Some(false),
        };
        let err = s.ledger.submit(&forge(statement, &s.admin)).unwrap_err();
        assert!(matches!(err, LedgerError::MalformedStatement { .. }), "{err}");
    }
}
