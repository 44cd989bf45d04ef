//! Lowercase hex encoding shared by every type that serializes as a hex
//! string (fields, hashes, keys, signatures, proofs).

use crate::error::FieldError;

/// Encode bytes as lowercase hex.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a hex string into bytes. Accepts an optional `0x` prefix and
/// surrounding whitespace.
pub fn decode(s: &str) -> Result<Vec<u8>, FieldError> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.len() % 2 != 0 {
        return Err(FieldError::InvalidHex(format!(
            "hex string has odd length: {}",
            s.len()
        )));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            s.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| FieldError::InvalidHex(format!("invalid hex at position {i}")))
        })
        .collect()
}

/// Decode exactly `N` bytes of hex.
pub fn decode_array<const N: usize>(s: &str) -> Result<[u8; N], FieldError> {
    let bytes = decode(s)?;
    if bytes.len() != N {
        return Err(FieldError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_lowercase() {
        assert_eq!(encode(&[0xAB, 0x01]), "ab01");
    }

    #[test]
    fn decode_accepts_prefix_and_whitespace() {
        assert_eq!(decode(" 0xab01 ").unwrap(), vec![0xab, 0x01]);
    }

    #[test]
    fn decode_rejects_odd_length() {
        assert!(matches!(decode("abc"), Err(FieldError::InvalidHex(_))));
    }

    #[test]
    fn decode_rejects_non_hex() {
        assert!(decode("zz").is_err());
    }

    #[test]
    fn decode_array_checks_length() {
        let err = decode_array::<4>("ab01").unwrap_err();
        assert_eq!(
            err,
            FieldError::InvalidLength {
                expected: 4,
                actual: 2
            }
        );
    }
}
