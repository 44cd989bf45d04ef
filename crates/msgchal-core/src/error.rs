//! # Error Types
//!
//! Errors shared across the workspace. Every error uses `thiserror` for
//! derive-based `Display` and `Error` implementations. Crates higher in the
//! DAG define their own enums and wrap these with `#[from]`.

use thiserror::Error;

/// Error parsing or constructing a [`Field`](crate::Field) or
/// [`Hash256`](crate::Hash256).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Input was not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Input decoded to the wrong number of bytes.
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required byte length.
        expected: usize,
        /// Byte length actually supplied.
        actual: usize,
    },

    /// The value does not fit in 255 bits.
    #[error("value exceeds 255 bits (top bit of the most significant byte is set)")]
    Overflow,
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key generation or parsing failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// Digest computation failed.
    #[error("digest error: {0}")]
    DigestError(String),
}

/// Error loading configuration from the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Environment variable name.
        var: &'static str,
        /// The raw value found.
        value: String,
    },

    /// The address capacity must admit at least one registration.
    #[error("address capacity must be at least 1")]
    ZeroCapacity,
}

impl From<FieldError> for CryptoError {
    fn from(err: FieldError) -> Self {
        CryptoError::KeyError(err.to_string())
    }
}
