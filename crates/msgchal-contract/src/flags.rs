//! # Message Flags
//!
//! The top six bits of a message, positions 249..=254, are flags `f1`..`f6`
//! (`f1` at bit 249). The low bits are payload and are not inspected.
//!
//! Rules:
//!
//! - `f1` is exclusive: when set, `f2`..`f6` must all be clear.
//! - `f2` implies `f3`.
//! - `f4` excludes `f5` and `f6`.

use msgchal_core::Field;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bit position of `f1`.
pub const FLAG_OFFSET: usize = 249;

/// Number of flag bits.
pub const FLAG_COUNT: usize = 6;

/// A flag rule the message breaks.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagViolation {
    /// `f1` is set together with at least one other flag.
    #[error("f1 is exclusive but another flag is set")]
    ExclusiveF1,
    /// `f2` is set without `f3`.
    #[error("f2 requires f3")]
    F2WithoutF3,
    /// `f4` is set together with `f5` or `f6`.
    #[error("f4 excludes f5 and f6")]
    F4WithF5OrF6,
}

/// The six flag bits of a message, `flags[0]` being `f1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageFlags([bool; FLAG_COUNT]);

impl MessageFlags {
    /// Read the flag bits of a message.
    pub fn from_message(message: &Field) -> Self {
        let mut flags = [false; FLAG_COUNT];
        for (i, flag) in flags.iter_mut().enumerate() {
            *flag = message.bit(FLAG_OFFSET + i);
        }
        Self(flags)
    }

    /// Build from explicit flags, `flags[0]` being `f1`.
    pub fn new(flags: [bool; FLAG_COUNT]) -> Self {
        Self(flags)
    }

    /// Flag `n`, 1-based (`get(1)` is `f1`). Out-of-range reads as clear.
    pub fn get(&self, n: usize) -> bool {
        n.checked_sub(1)
            .and_then(|i| self.0.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// All six flags, `f1` first.
    pub fn as_array(&self) -> [bool; FLAG_COUNT] {
        self.0
    }

    /// Write these flags into the flag bits of `message`, keeping its payload.
    pub fn apply_to(&self, message: Field) -> Field {
        self.0
            .iter()
            .enumerate()
            .fold(message, |m, (i, &b)| m.with_bit(FLAG_OFFSET + i, b))
    }

    /// Check the three consistency rules, in order.
    pub fn validate(&self) -> Result<(), FlagViolation> {
        let [f1, f2, f3, f4, f5, f6] = self.0;
        if f1 && (f2 || f3 || f4 || f5 || f6) {
            return Err(FlagViolation::ExclusiveF1);
        }
        if f2 && !f3 {
            return Err(FlagViolation::F2WithoutF3);
        }
        if f4 && (f5 || f6) {
            return Err(FlagViolation::F4WithF5OrF6);
        }
        Ok(())
    }
}

impl std::fmt::Display for MessageFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, set) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "f{}={}", i + 1, u8::from(*set))?;
        }
        Ok(())
    }
}

/// Read and validate the flags of a message.
pub fn validate_message_flags(message: &Field) -> Result<MessageFlags, FlagViolation> {
    let flags = MessageFlags::from_message(message);
    flags.validate()?;
    Ok(flags)
}
