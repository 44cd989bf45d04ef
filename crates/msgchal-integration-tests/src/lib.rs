//! # Scenario Harness
//!
//! A deployed ledger, a client-side builder, an off-chain mirror and an
//! admin key, wired together the way a real client drives the contract.
//! The mirror is only updated after the ledger accepts a transaction.

use msgchal_contract::{ContractState, TransitionError};
use msgchal_core::{ContractConfig, Field};
use msgchal_crypto::{Identity, KeyPair};
use msgchal_ledger::{LedgerError, LocalLedger, MirrorClient, Receipt, TransactionBuilder};
use msgchal_zkp::MockProofSystem;

/// Deterministic key pair number `n`.
pub fn user(n: u32) -> KeyPair {
    let mut seed = [0xa5u8; 32];
    seed[..4].copy_from_slice(&n.to_be_bytes());
    KeyPair::from_seed(&seed)
}

/// An initialized contract and one client.
pub struct Scenario {
    pub ledger: LocalLedger<MockProofSystem>,
    pub builder: TransactionBuilder<MockProofSystem>,
    pub mirror: MirrorClient,
    pub admin: KeyPair,
}

impl Scenario {
    /// Deploy with the default capacity and initialize as `user(0)`.
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_config(ContractConfig::default())
    }

    /// Deploy with `config` and initialize as `user(0)`.
    pub fn with_config(config: ContractConfig) -> Result<Self, LedgerError> {
        let ledger = LocalLedger::deploy(MockProofSystem, config)?;
        let builder = TransactionBuilder::new(MockProofSystem, config)?;
        let admin = user(0);
        ledger.submit(&builder.initialize(&admin)?)?;
        Ok(Self {
            ledger,
            builder,
            mirror: MirrorClient::new(),
            admin,
        })
    }

    /// Latest committed state.
    pub fn state(&self) -> Result<ContractState, LedgerError> {
        self.ledger
            .state()
            .ok_or(LedgerError::Transition(TransitionError::NotInitialized))
    }

    /// Admin registers `who`.
    pub fn register(&mut self, who: &Identity) -> Result<Receipt, LedgerError> {
        self.register_as(&user(0), who)
    }

    /// `signer` attempts to register `who`.
    pub fn register_as(&mut self, signer: &KeyPair, who: &Identity) -> Result<Receipt, LedgerError> {
        let tx = self.builder.register_address(
            &self.state()?,
            signer,
            who,
            &self.mirror.address_witness(who),
        )?;
        let receipt = self.ledger.submit(&tx)?;
        self.mirror.record_registration(who);
        Ok(receipt)
    }

    /// `sender` deposits `message`.
    pub fn deposit(&mut self, sender: &KeyPair, message: Field) -> Result<Receipt, LedgerError> {
        let id = sender.identity();
        let tx = self.builder.deposit_message(
            &self.state()?,
            sender,
            &message,
            &self.mirror.message_witness(&id),
            &self.mirror.address_witness(&id),
        )?;
        let receipt = self.ledger.submit(&tx)?;
        self.mirror.record_message(&id, message);
        Ok(receipt)
    }

    /// Prove `who`'s message equals `message`, using `who`'s current
    /// message witness.
    pub fn check(&self, who: &Identity, message: Field) -> Result<bool, LedgerError> {
        self.check_with(who, message, who)
    }

    /// Like [`check`](Self::check), but with the witness of `witness_of`.
    pub fn check_with(
        &self,
        who: &Identity,
        message: Field,
        witness_of: &Identity,
    ) -> Result<bool, LedgerError> {
        let tx = self.builder.check_message(
            &self.state()?,
            who,
            &message,
            &self.mirror.message_witness(witness_of),
        )?;
        Ok(self.ledger.submit(&tx)?.returned.unwrap_or(false))
    }
}
