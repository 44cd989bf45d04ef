//! # msgchal-contract: Message Challenge Contract
//!
//! A verifiable state machine holding an admin-curated allowlist of
//! identities and one message per identity. Both collections live off-chain
//! in authenticated maps; the contract persists only their roots, two
//! counters and the admin identity.
//!
//! ## Transitions
//!
//! | method | signed | reads | writes |
//! |---|---|---|---|
//! | `initialize` | yes | nothing | all five fields |
//! | `register_address` | admin | admin, address count, address root | address count, address root |
//! | `deposit_message` | sender | address root, message count, message root | message count, message root |
//! | `check_message` | no | message root | nothing |
//!
//! Every transition evaluates all of its assertions against the state it
//! was handed and either returns a [`TransitionOutcome`] describing what it
//! read and what it writes, or a [`TransitionError`]. Nothing is mutated
//! until the outcome is applied, so a rejected transition has no effect.
//!
//! ## Layout
//!
//! - `state.rs`: `ContractState`, field names and values, field sets.
//! - `flags.rs`: the pure flag-bit predicate checked by `deposit_message`.
//! - `transition.rs`: the engine.
//! - `contract.rs`: `Contract`, a single owner applying outcomes in place.
//! - `error.rs`: `TransitionError` and its coarse `ErrorKind`.

pub mod contract;
pub mod error;
pub mod flags;
pub mod state;
pub mod transition;

pub use contract::Contract;
pub use error::{ErrorKind, ExpectedLeaf, MapKind, TransitionError, WitnessMismatch};
pub use flags::{validate_message_flags, FlagViolation, MessageFlags, FLAG_COUNT, FLAG_OFFSET};
pub use state::{ContractState, FieldSet, FieldValue, StateField};
pub use transition::{
    check_message, deposit_message, initialize, register_address, Caller, Method,
    TransitionOutcome, REGISTERED, UNSET,
};
