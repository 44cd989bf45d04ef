//! # Key Subcommand
//!
//! Prints an Ed25519 identity and the address-map key it occupies. With
//! `--seed` the key pair is derived deterministically; otherwise it is
//! freshly generated.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use msgchal_core::Field;
use msgchal_crypto::KeyPair;

/// Arguments for `msgchal key`.
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// 32-byte seed as 64 hex digits.
    #[arg(long)]
    pub seed: Option<String>,
}

/// An identity and its map key.
#[derive(Debug, Serialize)]
pub struct KeyReport {
    pub identity: String,
    pub map_key: Field,
}

/// Execute the key subcommand.
pub fn run_key(args: &KeyArgs) -> Result<u8> {
    let report = derive(args.seed.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(0)
}

/// Build the report for `seed`, or for a fresh key pair.
pub fn derive(seed: Option<&str>) -> Result<KeyReport> {
    let keypair = match seed {
        Some(seed) => crate::keypair_from_hex(seed)?,
        None => KeyPair::generate(),
    };
    let identity = keypair.identity();
    Ok(KeyReport {
        identity: identity.to_hex(),
        map_key: identity.map_key(),
    })
}
