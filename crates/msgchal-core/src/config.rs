//! # Contract Configuration
//!
//! Deployment parameters. They are compiled into the transition circuits,
//! so a ledger only accepts proofs built for the configuration it was
//! deployed with.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum number of registered addresses when nothing else is configured.
pub const DEFAULT_ADDRESS_CAPACITY: u64 = 100;

/// Environment variable overriding [`ContractConfig::address_capacity`].
pub const ADDRESS_CAPACITY_VAR: &str = "MSGCHAL_ADDRESS_CAPACITY";

/// Deployment parameters of a message challenge contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Maximum number of addresses the admin may register.
    pub address_capacity: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address_capacity: DEFAULT_ADDRESS_CAPACITY,
        }
    }
}

impl ContractConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `MSGCHAL_ADDRESS_CAPACITY` (default: 100)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let address_capacity = match lookup(ADDRESS_CAPACITY_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: ADDRESS_CAPACITY_VAR,
                    value: raw.clone(),
                })?,
            None => DEFAULT_ADDRESS_CAPACITY,
        };
        let config = Self { address_capacity };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations under which no transition could ever succeed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}
