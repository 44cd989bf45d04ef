//! # Contract Owner
//!
//! [`Contract`] owns the state exclusively and exposes it only through the
//! four transitions. A transition's outcome is applied after every
//! assertion passed; on error the state is exactly as before.
//!
//! ```text
//! Uninitialized ──initialize──▶ Initialized ──register / deposit──▶ Initialized
//!                                    │
//!                                    └──check (read-only)
//! ```
//!
//! This is the in-process owner. The proof-gated ledger in
//! `msgchal-ledger` applies the same outcomes after verifying a proof.

use msgchal_core::{ContractConfig, Field};
use msgchal_crypto::{Identity, MembershipWitness};

use crate::error::TransitionError;
use crate::state::ContractState;
use crate::transition::{self, Caller, TransitionOutcome};

/// A single contract instance and its configuration.
#[derive(Debug, Clone)]
pub struct Contract {
    config: ContractConfig,
    state: Option<ContractState>,
}

impl Contract {
    /// An uninitialized contract.
    pub fn new(config: ContractConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// The committed state, if initialized.
    pub fn state(&self) -> Option<&ContractState> {
        self.state.as_ref()
    }

    /// The configuration this contract enforces.
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    // ─── Transitions ────────────────────────────────────────────────

    /// Initialize once; the signing caller becomes admin.
    pub fn initialize(&mut self, caller: &Caller) -> Result<TransitionOutcome, TransitionError> {
        if self.state.is_some() {
            tracing::warn!(caller = %caller.identity, "re-initialization rejected");
            return Err(TransitionError::AlreadyInitialized);
        }
        let outcome = transition::initialize(caller)?;
        self.state = outcome.update.to_state();
        tracing::info!(admin = %caller.identity, "contract initialized");
        Ok(outcome)
    }

    /// Admin registers `identity`.
    pub fn register_address(
        &mut self,
        caller: &Caller,
        identity: &Identity,
        witness: &MembershipWitness,
    ) -> Result<TransitionOutcome, TransitionError> {
        let state = self.initialized()?;
        let outcome =
            transition::register_address(state, caller, &self.config, identity, witness)?;
        self.commit(&outcome);
        Ok(outcome)
    }

    /// A registered caller deposits its message.
    pub fn deposit_message(
        &mut self,
        caller: &Caller,
        message: &Field,
        message_witness: &MembershipWitness,
        address_witness: &MembershipWitness,
    ) -> Result<TransitionOutcome, TransitionError> {
        let state = self.initialized()?;
        let outcome =
            transition::deposit_message(state, caller, message, message_witness, address_witness)?;
        self.commit(&outcome);
        Ok(outcome)
    }

    /// Whether `identity`'s message equals `message`. Never mutates.
    pub fn check_message(
        &self,
        identity: &Identity,
        message: &Field,
        witness: &MembershipWitness,
    ) -> Result<bool, TransitionError> {
        let state = self.initialized()?;
        let outcome = transition::check_message(state, identity, message, witness)?;
        Ok(outcome.returned.unwrap_or(false))
    }

    // ─── Internals ──────────────────────────────────────────────────

    fn initialized(&self) -> Result<&ContractState, TransitionError> {
        self.state.as_ref().ok_or(TransitionError::NotInitialized)
    }

    fn commit(&mut self, outcome: &TransitionOutcome) {
        if let Some(state) = self.state.as_mut() {
            *state = outcome.apply_to(state);
            tracing::info!(
                method = %outcome.method,
                address_count = state.address_count,
                message_count = state.message_count,
                "transition committed"
            );
        }
    }
}

impl Default for Contract {
    fn default() -> Self {
        Self::new(ContractConfig::default())
    }
}
