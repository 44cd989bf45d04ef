//! # msgchal-cli: Message Challenge Command-Line Interface
//!
//! ## Subcommands
//!
//! - `demo`: deploy a local ledger, register users, deposit and check one
//!   message each, print the committed state
//! - `flags`: decode the flag bits of a message and run the validator
//! - `key`: print an Ed25519 identity and its map key
//!
//! ## Crate Policy
//!
//! - Argument parsing lives next to each handler; `main.rs` only dispatches.
//! - Handlers build a serializable report and print it. No contract logic
//!   lives here.

pub mod demo;
pub mod flags;
pub mod keys;

use anyhow::{Context, Result};
use msgchal_crypto::KeyPair;

/// Parse a 32-byte hex seed into a key pair.
pub fn keypair_from_hex(seed: &str) -> Result<KeyPair> {
    let bytes = msgchal_core::hex::decode_array::<32>(seed).context("invalid seed")?;
    Ok(KeyPair::from_seed(&bytes))
}
