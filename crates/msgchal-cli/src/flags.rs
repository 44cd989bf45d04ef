//! # Flags Subcommand
//!
//! Decodes the six flag bits (positions 249 to 254) of a message and runs
//! the consistency rules over them. Exits 0 when valid and 2 when a rule is
//! violated.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use msgchal_contract::{validate_message_flags, FlagViolation, MessageFlags};
use msgchal_core::Field;

/// Arguments for `msgchal flags`.
#[derive(Args, Debug)]
pub struct FlagsArgs {
    /// Message as up to 64 hex digits, optionally `0x`-prefixed.
    #[arg(value_name = "HEX")]
    pub message: String,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Decoded flags and the validator's verdict.
#[derive(Debug, Serialize)]
pub struct FlagsReport {
    pub message: Field,
    pub flags: MessageFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<FlagViolation>,
}

impl FlagsReport {
    /// Whether every rule holds.
    pub fn is_valid(&self) -> bool {
        self.violation.is_none()
    }
}

/// Execute the flags subcommand.
pub fn run_flags(args: &FlagsArgs) -> Result<u8> {
    let report = decode(&args.message)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.flags);
        match &report.violation {
            None => println!("OK: flags are consistent"),
            Some(v) => println!("REJECTED: {v}"),
        }
    }
    Ok(if report.is_valid() { 0 } else { 2 })
}

/// Parse `hex` as a message and validate its flags.
pub fn decode(hex: &str) -> Result<FlagsReport> {
    let message = parse_message(hex)?;
    let flags = MessageFlags::from_message(&message);
    Ok(FlagsReport {
        message,
        flags,
        violation: validate_message_flags(&message).err(),
    })
}

/// Left-pads short input to 64 digits.
fn parse_message(hex: &str) -> Result<Field> {
    let digits = hex.trim().trim_start_matches("0x");
    anyhow::ensure!(digits.len() <= 64, "message longer than 64 hex digits");
    let padded = format!("{digits:0>64}");
    Field::from_hex(&padded).with_context(|| format!("invalid message: {hex}"))
}
