//! # msgchal-ledger: Ledger and Client Collaborators
//!
//! The contract engine in `msgchal-contract` only evaluates transitions.
//! This crate supplies the two sides around it:
//!
//! - **Ledger** (`ledger.rs`): [`LocalLedger`] holds the five committed
//!   fields behind a lock. It accepts a [`Transaction`] only if the sender's
//!   signature verifies over the canonical [`TransitionStatement`], the proof
//!   verifies against the method's compiled circuit, the statement has the
//!   shape its method allows (`rules.rs`), and every precondition equals
//!   the latest commit. Updates are applied together or not at all.
//!   Fields are never writable directly.
//! - **Client** (`mirror.rs`, `builder.rs`): [`MirrorClient`] keeps full
//!   copies of both maps off-chain and hands out witnesses;
//!   [`TransactionBuilder`] runs the engine locally, proves the resulting
//!   statement and signs it.
//!
//! Circuits for the four methods are compiled once per configuration
//! (`circuits.rs`) by both sides.

pub mod builder;
pub mod circuits;
pub mod error;
pub mod ledger;
pub mod mirror;
mod rules;
pub mod statement;

pub use builder::TransactionBuilder;
pub use circuits::TransitionCircuits;
pub use error::LedgerError;
pub use ledger::{LocalLedger, Receipt};
pub use mirror::MirrorClient;
pub use statement::{Transaction, TransitionStatement};
