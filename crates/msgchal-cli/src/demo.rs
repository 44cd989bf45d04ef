//! # Demo Subcommand
//!
//! Deploys a [`LocalLedger`] with the mock proof system, then for each user:
//! register (admin-signed), deposit an `f1` message (user-signed), and check
//! it (unsigned). Every step goes through the builder, the ledger and the
//! mirror exactly as a real client would.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use msgchal_contract::{ContractState, MessageFlags, FLAG_COUNT};
use msgchal_core::{ContractConfig, Field};
use msgchal_crypto::KeyPair;
use msgchal_ledger::{LocalLedger, MirrorClient, TransactionBuilder};
use msgchal_zkp::MockProofSystem;

/// Arguments for `msgchal demo`.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Number of users to register.
    #[arg(long, default_value_t = 3)]
    pub users: u32,

    /// Address capacity; defaults to `MSGCHAL_ADDRESS_CAPACITY` or 100.
    #[arg(long)]
    pub capacity: Option<u64>,
}

/// One user's row in the demo report.
#[derive(Debug, Serialize)]
pub struct UserReport {
    pub identity: String,
    pub map_key: Field,
    pub message: Field,
    pub checked: bool,
}

/// What the demo committed.
#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub capacity: u64,
    pub sequence: u64,
    pub state: ContractState,
    pub users: Vec<UserReport>,
}

/// Execute the demo subcommand.
pub fn run_demo(args: &DemoArgs) -> Result<u8> {
    let report = execute(args)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(0)
}

/// Run the flow and collect the report.
pub fn execute(args: &DemoArgs) -> Result<DemoReport> {
    let mut config = ContractConfig::from_env().context("loading contract configuration")?;
    if let Some(capacity) = args.capacity {
        config.address_capacity = capacity;
    }

    let ledger = LocalLedger::deploy(MockProofSystem, config)?;
    let builder = TransactionBuilder::new(MockProofSystem, config)?;
    let mut mirror = MirrorClient::new();

    let admin = seeded(0);
    ledger.submit(&builder.initialize(&admin)?)?;

    let mut users = Vec::new();
    for n in 1..=args.users {
        let user = seeded(n);
        let id = user.identity();
        let message = demo_message(n);

        builder
            .register_address(&committed(&ledger)?, &admin, &id, &mirror.address_witness(&id))
            .and_then(|tx| ledger.submit(&tx))
            .with_context(|| format!("registering user {n}"))?;
        mirror.record_registration(&id);

        builder
            .deposit_message(
                &committed(&ledger)?,
                &user,
                &message,
                &mirror.message_witness(&id),
                &mirror.address_witness(&id),
            )
            .and_then(|tx| ledger.submit(&tx))
            .with_context(|| format!("depositing message of user {n}"))?;
        mirror.record_message(&id, message);

        let tx = builder.check_message(
            &committed(&ledger)?,
            &id,
            &message,
            &mirror.message_witness(&id),
        )?;
        let receipt = ledger.submit(&tx)?;

        users.push(UserReport {
            identity: id.to_hex(),
            map_key: id.map_key(),
            message,
            checked: receipt.returned.unwrap_or(false),
        });
    }

    let state = committed(&ledger)?;
    anyhow::ensure!(
        mirror.in_sync_with(&state),
        "mirror diverged from committed roots"
    );
    tracing::info!(users = users.len(), sequence = ledger.sequence(), "demo complete");

    Ok(DemoReport {
        capacity: config.address_capacity,
        sequence: ledger.sequence(),
        state,
        users,
    })
}

fn committed(ledger: &LocalLedger<MockProofSystem>) -> Result<ContractState> {
    ledger.state().context("contract is not initialized")
}

fn seeded(n: u32) -> KeyPair {
    let mut seed = [0x6du8; 32];
    seed[..4].copy_from_slice(&n.to_be_bytes());
    KeyPair::from_seed(&seed)
}

/// Payload `n` with only `f1` set.
fn demo_message(n: u32) -> Field {
    let mut flags = [false; FLAG_COUNT];
    flags[0] = true;
    MessageFlags::new(flags).apply_to(Field::from_u64(u64::from(n)))
}
