//! # Contract State
//!
//! Five fields, created together at initialization and each committed
//! independently by the ledger:
//!
//! - `admin_address`: the initializer; never reassigned.
//! - `address_count` / `address_root`: size and root of the address map.
//! - `message_count` / `message_root`: size and root of the message map.
//!
//! A [`FieldSet`] names a subset of these fields with values. Transitions
//! describe what they read as one field set (preconditions the ledger must
//! match against the latest commit) and what they write as another.

use msgchal_core::Hash256;
use msgchal_crypto::{empty_root, Identity};
use serde::{Deserialize, Serialize};

/// The persisted state of an initialized contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractState {
    /// Identity that initialized the contract.
    pub admin_address: Identity,
    /// Number of registered addresses.
    pub address_count: u64,
    /// Root of the address map.
    pub address_root: Hash256,
    /// Number of deposited messages.
    pub message_count: u64,
    /// Root of the message map.
    pub message_root: Hash256,
}

impl ContractState {
    /// State right after `admin` initializes the contract: both maps empty,
    /// both counters zero.
    pub fn genesis(admin: Identity) -> Self {
        Self {
            admin_address: admin,
            address_count: 0,
            address_root: empty_root(),
            message_count: 0,
            message_root: empty_root(),
        }
    }

    /// Current value of one field.
    pub fn get(&self, field: StateField) -> FieldValue {
        match field {
            StateField::AdminAddress => FieldValue::Identity(self.admin_address),
            StateField::AddressCount => FieldValue::Count(self.address_count),
            StateField::AddressRoot => FieldValue::Root(self.address_root),
            StateField::MessageCount => FieldValue::Count(self.message_count),
            StateField::MessageRoot => FieldValue::Root(self.message_root),
        }
    }
}

/// Name of a persisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateField {
    /// `admin_address`
    AdminAddress,
    /// `address_count`
    AddressCount,
    /// `address_root`
    AddressRoot,
    /// `message_count`
    MessageCount,
    /// `message_root`
    MessageRoot,
}

impl StateField {
    /// All fields in declaration order.
    pub const ALL: [StateField; 5] = [
        Self::AdminAddress,
        Self::AddressCount,
        Self::AddressRoot,
        Self::MessageCount,
        Self::MessageRoot,
    ];

    /// The snake_case field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdminAddress => "admin_address",
            Self::AddressCount => "address_count",
            Self::AddressRoot => "address_root",
            Self::MessageCount => "message_count",
            Self::MessageRoot => "message_root",
        }
    }
}

impl std::fmt::Display for StateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StateField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown state field: {s}"))
    }
}

/// Value of a persisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// An identity (`admin_address`).
    Identity(Identity),
    /// A counter.
    Count(u64),
    /// A map root.
    Root(Hash256),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity(id) => write!(f, "{id}"),
            Self::Count(n) => write!(f, "{n}"),
            Self::Root(root) => write!(f, "{root}"),
        }
    }
}

/// A subset of the five fields with values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    /// `admin_address`, if part of the set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_address: Option<Identity>,
    /// `address_count`, if part of the set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_count: Option<u64>,
    /// `address_root`, if part of the set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_root: Option<Hash256>,
    /// `message_count`, if part of the set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u64>,
    /// `message_root`, if part of the set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_root: Option<Hash256>,
}

impl FieldSet {
    /// Every field of `state`.
    pub fn full(state: &ContractState) -> Self {
        Self {
            admin_address: Some(state.admin_address),
            address_count: Some(state.address_count),
            address_root: Some(state.address_root),
            message_count: Some(state.message_count),
            message_root: Some(state.message_root),
        }
    }

    /// The named fields of `state`.
    pub fn read(state: &ContractState, fields: &[StateField]) -> Self {
        fields.iter().fold(Self::default(), |mut set, field| {
            match field {
                StateField::AdminAddress => set.admin_address = Some(state.admin_address),
                StateField::AddressCount => set.address_count = Some(state.address_count),
                StateField::AddressRoot => set.address_root = Some(state.address_root),
                StateField::MessageCount => set.message_count = Some(state.message_count),
                StateField::MessageRoot => set.message_root = Some(state.message_root),
            }
            set
        })
    }

    /// The fields present in this set, in declaration order.
    pub fn entries(&self) -> Vec<(StateField, FieldValue)> {
        let mut out = Vec::new();
        if let Some(v) = self.admin_address {
            out.push((StateField::AdminAddress, FieldValue::Identity(v)));
        }
        if let Some(v) = self.address_count {
            out.push((StateField::AddressCount, FieldValue::Count(v)));
        }
        if let Some(v) = self.address_root {
            out.push((StateField::AddressRoot, FieldValue::Root(v)));
        }
        if let Some(v) = self.message_count {
            out.push((StateField::MessageCount, FieldValue::Count(v)));
        }
        if let Some(v) = self.message_root {
            out.push((StateField::MessageRoot, FieldValue::Root(v)));
        }
        out
    }

    /// Names of the fields present, in declaration order.
    pub fn fields(&self) -> Vec<StateField> {
        self.entries().into_iter().map(|(field, _)| field).collect()
    }

    /// Whether the set names no field.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// First field whose value in this set differs from `state`, as
    /// `(field, expected, actual)`.
    pub fn first_mismatch(&self, state: &ContractState) -> Option<(StateField, FieldValue, FieldValue)> {
        self.entries()
            .into_iter()
            .map(|(field, expected)| (field, expected, state.get(field)))
            .find(|(_, expected, actual)| expected != actual)
    }

    /// `state` with every field in this set overwritten.
    pub fn apply_to(&self, state: &ContractState) -> ContractState {
        ContractState {
            admin_address: self.admin_address.unwrap_or(state.admin_address),
            address_count: self.address_count.unwrap_or(state.address_count),
            address_root: self.address_root.unwrap_or(state.address_root),
            message_count: self.message_count.unwrap_or(state.message_count),
            message_root: self.message_root.unwrap_or(state.message_root),
        }
    }

    /// A complete state, if every field is present.
    pub fn to_state(&self) -> Option<ContractState> {
        Some(ContractState {
            admin_address: self.admin_address?,
            address_count: self.address_count?,
            address_root: self.address_root?,
            message_count: self.message_count?,
            message_root: self.message_root?,
        })
    }
}
