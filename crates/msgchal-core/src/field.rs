//! # Field Words and Hashes
//!
//! `Field` is a 255-bit unsigned word stored as 32 big-endian bytes with the
//! top bit of byte 0 always clear. Bits are addressed LSB first: bit 0 is the
//! least significant bit, bit 254 the most significant. A message's payload
//! lives in the low bits and its flags in bits 249..=254.
//!
//! `Hash256` is an opaque 32-byte digest. Roots of authenticated maps are
//! `Hash256`; keys and values are `Field`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;
use crate::hex;

/// Number of addressable bits in a [`Field`].
pub const FIELD_BITS: usize = 255;

/// A 255-bit word, big-endian, bit 255 always clear.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Field([u8; 32]);

impl Field {
    /// The zero word. Encodes boolean false and the empty map leaf.
    pub const ZERO: Field = Field([0u8; 32]);

    /// The word `1`. Encodes boolean true.
    pub const ONE: Field = {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        Field(bytes)
    };

    /// Build a field from 32 big-endian bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Overflow`] when bit 255 is set.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Result<Self, FieldError> {
        if bytes[0] & 0x80 != 0 {
            return Err(FieldError::Overflow);
        }
        Ok(Self(bytes))
    }

    /// Build a field from 32 big-endian bytes, discarding every bit at or
    /// above `bits`.
    pub fn from_be_bytes_truncated(bytes: [u8; 32], bits: usize) -> Self {
        Self(bytes).truncate(bits.min(FIELD_BITS))
    }

    /// Build a field holding a small integer.
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Boolean encoding: `true` is `1`, `false` is `0`.
    pub fn from_bool(value: bool) -> Self {
        if value {
            Self::ONE
        } else {
            Self::ZERO
        }
    }

    /// Build a field from LSB-first bits. Bits beyond index 254 are ignored.
    pub fn from_bits(bits: &[bool]) -> Self {
        bits.iter()
            .take(FIELD_BITS)
            .enumerate()
            .fold(Self::ZERO, |acc, (i, &b)| acc.with_bit(i, b))
    }

    /// The raw big-endian bytes.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Borrow the raw big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// LSB-first bit decomposition, always [`FIELD_BITS`] long.
    pub fn to_bits(&self) -> Vec<bool> {
        (0..FIELD_BITS).map(|i| self.bit(i)).collect()
    }

    /// Read bit `index` (LSB first). Out-of-range indices read as clear.
    pub fn bit(&self, index: usize) -> bool {
        if index >= FIELD_BITS {
            return false;
        }
        let byte = self.0[31 - index / 8];
        (byte >> (index % 8)) & 1 == 1
    }

    /// Return a copy with bit `index` set to `value`. Out-of-range indices
    /// leave the word unchanged.
    #[must_use]
    pub fn with_bit(mut self, index: usize, value: bool) -> Self {
        if index >= FIELD_BITS {
            return self;
        }
        let mask = 1u8 << (index % 8);
        let byte = &mut self.0[31 - index / 8];
        if value {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        self
    }

    /// Clear every bit at index `bits` and above.
    #[must_use]
    pub fn truncate(mut self, bits: usize) -> Self {
        for (i, byte) in self.0.iter_mut().rev().enumerate() {
            let low = i * 8;
            if bits <= low {
                *byte = 0;
            } else if bits < low + 8 {
                *byte &= (1u8 << (bits - low)) - 1;
            }
        }
        self
    }

    /// Clear the lowest `bits` bits.
    #[must_use]
    pub fn clear_low_bits(mut self, bits: usize) -> Self {
        for (i, byte) in self.0.iter_mut().rev().enumerate() {
            let low = i * 8;
            if bits >= low + 8 {
                *byte = 0;
            } else if bits > low {
                *byte &= !((1u8 << (bits - low)) - 1);
            }
        }
        self
    }

    /// Whether every bit is clear.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Lowercase hex of the 32 big-endian bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse 64 hex characters (optional `0x` prefix).
    pub fn from_hex(s: &str) -> Result<Self, FieldError> {
        Self::from_be_bytes(hex::decode_array::<32>(s)?)
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

impl From<u64> for Field {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Field(0x{})", self.to_hex())
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 32-byte digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse 64 hex characters (optional `0x` prefix).
    pub fn from_hex(s: &str) -> Result<Self, FieldError> {
        Ok(Self(hex::decode_array::<32>(s)?))
    }
}

impl std::fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash256({}...)", &self.to_hex()[..16])
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
