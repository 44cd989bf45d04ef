//! # Transition Engine
//!
//! The four operations. Each takes the committed state by reference,
//! evaluates every assertion, and returns a [`TransitionOutcome`] naming the
//! fields it read and the fields it writes. None of them mutates anything.
//!
//! Mutating transitions use each witness twice: once folded with the leaf
//! value the slot must hold now (verification against the committed root),
//! once folded with the value it will hold (the root after the write).

use msgchal_core::{ContractConfig, Field, Hash256};
use msgchal_crypto::{Identity, MembershipWitness};
use serde::{Deserialize, Serialize};

use crate::error::{ExpectedLeaf, MapKind, TransitionError, WitnessMismatch};
use crate::flags::validate_message_flags;
use crate::state::{ContractState, FieldSet, StateField};

/// Leaf value of an absent key in either map.
pub const UNSET: Field = Field::ZERO;

/// Leaf value marking an identity as registered in the address map.
pub const REGISTERED: Field = Field::ONE;

/// The contract's methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Create all five fields; the caller becomes admin.
    Initialize,
    /// Admin adds an identity to the allowlist.
    RegisterAddress,
    /// A registered identity deposits its single message.
    DepositMessage,
    /// Anyone proves an identity's message against the committed root.
    CheckMessage,
}

impl Method {
    /// Every method, in declaration order.
    pub const ALL: [Method; 4] = [
        Self::Initialize,
        Self::RegisterAddress,
        Self::DepositMessage,
        Self::CheckMessage,
    ];

    /// The snake_case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::RegisterAddress => "register_address",
            Self::DepositMessage => "deposit_message",
            Self::CheckMessage => "check_message",
        }
    }

    /// Whether a transaction invoking this method must carry the sender's
    /// signature.
    pub fn requires_signature(&self) -> bool {
        !matches!(self, Self::CheckMessage)
    }

    /// Fields whose committed values the method asserts.
    pub fn reads(&self) -> &'static [StateField] {
        match self {
            Self::Initialize => &[],
            Self::RegisterAddress => &[
                StateField::AdminAddress,
                StateField::AddressCount,
                StateField::AddressRoot,
            ],
            Self::DepositMessage => &[
                StateField::AddressRoot,
                StateField::MessageCount,
                StateField::MessageRoot,
            ],
            Self::CheckMessage => &[StateField::MessageRoot],
        }
    }

    /// Fields the method writes.
    pub fn writes(&self) -> &'static [StateField] {
        match self {
            Self::Initialize => &StateField::ALL,
            Self::RegisterAddress => &[StateField::AddressCount, StateField::AddressRoot],
            Self::DepositMessage => &[StateField::MessageCount, StateField::MessageRoot],
            Self::CheckMessage => &[],
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is invoking a transition, and whether they signed for it.
///
/// The engine trusts `signed`; the ledger sets it only after checking the
/// signature over the transaction's statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// Sender identity.
    pub identity: Identity,
    /// Whether the sender's signature accompanies the call.
    pub signed: bool,
}

impl Caller {
    /// A caller whose signature accompanies the call.
    pub fn signed(identity: Identity) -> Self {
        Self {
            identity,
            signed: true,
        }
    }

    /// A caller without a signature.
    pub fn unsigned(identity: Identity) -> Self {
        Self {
            identity,
            signed: false,
        }
    }

    fn require_signature(&self) -> Result<Identity, TransitionError> {
        if self.signed {
            Ok(self.identity)
        } else {
            Err(TransitionError::MissingSignature)
        }
    }
}

/// What an accepted transition read and what it writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    /// The method that produced this outcome.
    pub method: Method,
    /// The signing sender, for methods that require one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Identity>,
    /// Field values the transition asserted; must equal the latest commit.
    pub preconditions: FieldSet,
    /// Field values the transition writes.
    pub update: FieldSet,
    /// The method's return value, if it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned: Option<bool>,
}

impl TransitionOutcome {
    /// `state` with this outcome's writes applied.
    pub fn apply_to(&self, state: &ContractState) -> ContractState {
        self.update.apply_to(state)
    }
}

/// Creates the contract state with the signing caller as admin.
pub fn initialize(caller: &Caller) -> Result<TransitionOutcome, TransitionError> {
    let admin = caller.require_signature()?;
    let genesis = ContractState::genesis(admin);
    tracing::debug!(admin = %admin, "initialize");
    Ok(TransitionOutcome {
        method: Method::Initialize,
        sender: Some(admin),
        preconditions: FieldSet::default(),
        update: FieldSet::full(&genesis),
        returned: None,
    })
}

/// Admin-only: adds `identity` to the address map.
///
/// `witness` must authenticate the identity's slot as unset under the
/// committed `address_root`. An identity already registered fails that
/// check, so double registration is rejected without a separate lookup.
pub fn register_address(
    state: &ContractState,
    caller: &Caller,
    config: &ContractConfig,
    identity: &Identity,
    witness: &MembershipWitness,
) -> Result<TransitionOutcome, TransitionError> {
    let sender = caller.require_signature()?;
    if sender != state.admin_address {
        return Err(TransitionError::Unauthorized {
            required: state.admin_address,
            caller: sender,
        });
    }
    if state.address_count >= config.address_capacity {
        return Err(TransitionError::CapacityExceeded {
            count: state.address_count,
            capacity: config.address_capacity,
        });
    }
    verify_slot(
        witness,
        identity,
        UNSET,
        state.address_root,
        MapKind::Address,
        ExpectedLeaf::Empty,
    )?;

    let address_count = state
        .address_count
        .checked_add(1)
        .ok_or(TransitionError::CounterOverflow(StateField::AddressCount))?;
    let address_root = witness.compute_root(&REGISTERED);
    tracing::debug!(identity = %identity, address_count, "register_address");

    Ok(TransitionOutcome {
        method: Method::RegisterAddress,
        sender: Some(sender),
        preconditions: FieldSet::read(state, Method::RegisterAddress.reads()),
        update: FieldSet {
            address_count: Some(address_count),
            address_root: Some(address_root),
            ..FieldSet::default()
        },
        returned: None,
    })
}

/// A registered sender deposits `message`, once.
///
/// `address_witness` must show the sender's address slot registered;
/// `message_witness` must show the sender's message slot unset.
pub fn deposit_message(
    state: &ContractState,
    caller: &Caller,
    message: &Field,
    message_witness: &MembershipWitness,
    address_witness: &MembershipWitness,
) -> Result<TransitionOutcome, TransitionError> {
    let sender = caller.require_signature()?;
    verify_slot(
        address_witness,
        &sender,
        REGISTERED,
        state.address_root,
        MapKind::Address,
        ExpectedLeaf::Registered,
    )?;
    verify_slot(
        message_witness,
        &sender,
        UNSET,
        state.message_root,
        MapKind::Message,
        ExpectedLeaf::Empty,
    )?;
    let flags = validate_message_flags(message)?;
    if message.is_zero() {
        return Err(TransitionError::EmptyMessage);
    }

    let message_count = state
        .message_count
        .checked_add(1)
        .ok_or(TransitionError::CounterOverflow(StateField::MessageCount))?;
    let message_root = message_witness.compute_root(message);
    tracing::debug!(sender = %sender, %flags, message_count, "deposit_message");

    Ok(TransitionOutcome {
        method: Method::DepositMessage,
        sender: Some(sender),
        preconditions: FieldSet::read(state, Method::DepositMessage.reads()),
        update: FieldSet {
            message_count: Some(message_count),
            message_root: Some(message_root),
            ..FieldSet::default()
        },
        returned: None,
    })
}

/// Proves that `identity`'s deposited message equals `message`.
///
/// Unsigned and read-only. Returns `true` in the outcome when both checks
/// hold; any mismatch is an error, not `false`.
pub fn check_message(
    state: &ContractState,
    identity: &Identity,
    message: &Field,
    witness: &MembershipWitness,
) -> Result<TransitionOutcome, TransitionError> {
    let (root, key) = witness.compute_root_and_key(message);
    if root != state.message_root {
        return Err(stale(MapKind::Message, WitnessMismatch::Root, ExpectedLeaf::Message));
    }
    if key != identity.map_key() {
        return Err(stale(MapKind::Message, WitnessMismatch::Key, ExpectedLeaf::Message));
    }
    tracing::debug!(identity = %identity, "check_message");

    Ok(TransitionOutcome {
        method: Method::CheckMessage,
        sender: None,
        preconditions: FieldSet::read(state, Method::CheckMessage.reads()),
        update: FieldSet::default(),
        returned: Some(true),
    })
}

/// Checks that `witness`, folded with `leaf`, spells `identity`'s key and
/// lands on `committed`.
fn verify_slot(
    witness: &MembershipWitness,
    identity: &Identity,
    leaf: Field,
    committed: Hash256,
    map: MapKind,
    expected: ExpectedLeaf,
) -> Result<(), TransitionError> {
    let (root, key) = witness.compute_root_and_key(&leaf);
    let mismatch = if key != identity.map_key() {
        Some(WitnessMismatch::Key)
    } else if root != committed {
        Some(WitnessMismatch::Root)
    } else {
        None
    };
    tracing::debug!(%map, %expected, ok = mismatch.is_none(), "witness check");
    match mismatch {
        Some(mismatch) => Err(stale(map, mismatch, expected)),
        None => Ok(()),
    }
}

fn stale(map: MapKind, mismatch: WitnessMismatch, expected: ExpectedLeaf) -> TransitionError {
    TransitionError::StaleWitness {
        map,
        mismatch,
        expected,
    }
}
