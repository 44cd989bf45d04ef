//! # Transition Errors
//!
//! Every assertion a transition makes has a variant here. All are raised
//! before any field is written; a transition that returns one of these had
//! no effect.

use msgchal_crypto::Identity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flags::FlagViolation;
use crate::state::StateField;

/// Which authenticated map a witness was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapKind {
    /// The allowlist of registered identities.
    Address,
    /// The one-message-per-identity registry.
    Message,
}

impl std::fmt::Display for MapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Address => "address map",
            Self::Message => "message map",
        })
    }
}

/// Which half of a witness projection disagreed with the committed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WitnessMismatch {
    /// The path spells a different key than the identity's hash.
    Key,
    /// The projected root differs from the committed root.
    Root,
}

/// The leaf value a witness was folded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedLeaf {
    /// The slot must be unset (unregistered identity, or no message yet).
    Empty,
    /// The slot must hold the registration marker.
    Registered,
    /// The slot must hold the claimed message.
    Message,
}

impl std::fmt::Display for ExpectedLeaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Empty => "empty",
            Self::Registered => "registered",
            Self::Message => "claimed message",
        })
    }
}

/// Coarse classification of a [`TransitionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The caller is not who the transition requires, or did not sign.
    Authorization,
    /// A witness does not match the committed state.
    StaleWitness,
    /// The address allowlist is full.
    Capacity,
    /// The message's flag bits are inconsistent.
    FlagConsistency,
    /// The message value itself is unusable.
    InvalidMessage,
    /// The contract is not in a lifecycle stage that admits the call.
    Lifecycle,
}

/// A rejected transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The transition must be signed by the sender and was not.
    #[error("transition requires the sender's signature")]
    MissingSignature,

    /// The sender is not the identity the transition requires.
    #[error("caller {caller} is not authorized; required {required}")]
    Unauthorized {
        /// Identity the transition requires.
        required: Identity,
        /// Identity that called.
        caller: Identity,
    },

    /// A witness disagrees with the committed state.
    #[error("stale {map} witness: {mismatch:?} mismatch with the slot expected {expected}")]
    StaleWitness {
        /// Map the witness was checked against.
        map: MapKind,
        /// Which projection disagreed.
        mismatch: WitnessMismatch,
        /// Leaf value the witness was folded with.
        expected: ExpectedLeaf,
    },

    /// The allowlist already holds `capacity` addresses.
    #[error("address capacity reached: {count} of {capacity} registered")]
    CapacityExceeded {
        /// Current address count.
        count: u64,
        /// Configured capacity.
        capacity: u64,
    },

    /// The message's flag bits violate a consistency rule.
    #[error("flag consistency violated: {0}")]
    FlagConsistency(#[from] FlagViolation),

    /// The all-zero message cannot be told apart from an empty slot.
    #[error("message must not be zero")]
    EmptyMessage,

    /// A counter would overflow.
    #[error("counter {0} would overflow")]
    CounterOverflow(StateField),

    /// The contract has not been initialized.
    #[error("contract is not initialized")]
    NotInitialized,

    /// The contract has already been initialized.
    #[error("contract is already initialized")]
    AlreadyInitialized,
}

impl TransitionError {
    /// Coarse classification for callers that only branch on the category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSignature | Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::StaleWitness { .. } => ErrorKind::StaleWitness,
            Self::CapacityExceeded { .. } | Self::CounterOverflow(_) => ErrorKind::Capacity,
            Self::FlagConsistency(_) => ErrorKind::FlagConsistency,
            Self::EmptyMessage => ErrorKind::InvalidMessage,
            Self::NotInitialized | Self::AlreadyInitialized => ErrorKind::Lifecycle,
        }
    }
}
