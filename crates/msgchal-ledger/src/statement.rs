//! # Statements and Transactions
//!
//! A [`TransitionStatement`] is everything a transition discloses: method,
//! sender, the field values it read and the values it writes, and its
//! return value. Its canonical JSON is both the proof's public input and the
//! message the sender signs. Witnesses, registered identities and message
//! contents stay in the prover's private inputs.

use msgchal_contract::{FieldSet, Method, TransitionOutcome};
use msgchal_core::{CanonicalBytes, CanonicalizationError};
use msgchal_crypto::{Identity, Signature};
use serde::{Deserialize, Serialize};

/// The public statement of one transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionStatement {
    /// Invoked method.
    pub method: Method,
    /// Signing sender, for methods that require one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Identity>,
    /// Field values read; must equal the latest commit.
    pub preconditions: FieldSet,
    /// Field values written.
    pub update: FieldSet,
    /// Return value, if the method has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned: Option<bool>,
}

impl TransitionStatement {
    /// Canonical bytes: proof public input and signed payload.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(self)
    }
}

impl From<TransitionOutcome> for TransitionStatement {
    fn from(outcome: TransitionOutcome) -> Self {
        Self {
            method: outcome.method,
            sender: outcome.sender,
            preconditions: outcome.preconditions,
            update: outcome.update,
            returned: outcome.returned,
        }
    }
}

/// A proven, optionally signed statement submitted to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction<Proof> {
    /// What the transition claims.
    pub statement: TransitionStatement,
    /// Proof of `statement` under the method's circuit.
    pub proof: Proof,
    /// Sender's signature over the canonical statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
}

impl<Proof> Transaction<Proof> {
    /// The invoked method.
    pub fn method(&self) -> Method {
        self.statement.method
    }
}
