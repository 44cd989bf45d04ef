//! # msgchal-core: Foundational Types
//!
//! Leaf crate of the message challenge workspace. Every other `msgchal-*`
//! crate depends on it; it depends on nothing internal.
//!
//! ## Contents
//!
//! - **`Field`**: a 255-bit word with LSB-first bit addressing. Map keys,
//!   map values and messages are all `Field`s.
//! - **`Hash256`**: a 32-byte digest. Authenticated map roots are `Hash256`.
//! - **`CanonicalBytes`**: the only input accepted for signing and proving.
//!   Transition statements are serialized once, deterministically, and both
//!   the signature and the proof bind to the same bytes.
//! - **`ContractConfig`**: the deployment parameters baked into circuits.
//! - **Errors**: `CryptoError`, `FieldError`, `CanonicalizationError`,
//!   `ConfigError`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `msgchal-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod config;
pub mod error;
pub mod field;
pub mod hex;

pub use canonical::CanonicalBytes;
pub use config::{ContractConfig, DEFAULT_ADDRESS_CAPACITY};
pub use error::{CanonicalizationError, ConfigError, CryptoError, FieldError};
pub use field::{Field, Hash256, FIELD_BITS};
