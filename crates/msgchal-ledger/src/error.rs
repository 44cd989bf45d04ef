//! # Ledger Errors

use msgchal_contract::{FieldValue, Method, StateField, TransitionError};
use msgchal_core::{CanonicalizationError, ConfigError, CryptoError};
use msgchal_zkp::{ProofError, VerifyError};
use thiserror::Error;

/// Why the ledger rejected a transaction, or why a client could not build
/// one.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The transition's own assertions failed.
    #[error("transition rejected: {0}")]
    Transition(#[from] TransitionError),

    /// The sender's signature did not verify over the statement.
    #[error("signature rejected: {0}")]
    Signature(#[from] CryptoError),

    /// A signed method's statement names no sender.
    #[error("{0} statement has no sender")]
    MissingSender(Method),

    /// The proof is well-formed but does not verify for the statement.
    #[error("proof does not verify for {0}")]
    InvalidProof(Method),

    /// The proof could not be checked at all.
    #[error("proof verification error: {0}")]
    Verify(#[from] VerifyError),

    /// Circuit compilation or proof generation failed.
    #[error("proof system error: {0}")]
    Proof(#[from] ProofError),

    /// A precondition disagrees with the latest committed value.
    #[error("stale precondition on {field}: expected {expected}, committed {actual}")]
    StalePrecondition {
        /// Field that disagreed.
        field: StateField,
        /// Value the statement asserted.
        expected: FieldValue,
        /// Value currently committed.
        actual: FieldValue,
    },

    /// The statement's shape does not fit its method.
    #[error("malformed {method} statement: {reason}")]
    MalformedStatement {
        /// Method the statement claims.
        method: Method,
        /// What is wrong with it.
        reason: String,
    },

    /// Direct field writes are never allowed.
    #[error("permission denied: {0} can only change through a proven transition")]
    PermissionDenied(StateField),

    /// The deployment configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Statement serialization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}
