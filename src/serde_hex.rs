//! Serde helpers to serialize/deserialize 32-byte digests as 0x-prefixed hex strings.
//!
//! - `hex32`: for `[u8; 32]` with exact length enforcement.
//!
//! Output is always `0x` followed by lowercase hex. Input must carry the `0x`
//! prefix; hex digits may be either case.

use serde::{Deserialize, Deserializer, Serializer};
use thiserror::Error;

/// Errors that can occur during hex (de)serialization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HexSerdeError {
    /// Input string must begin with `0x` prefix.
    #[error("missing 0x prefix")]
    MissingPrefix,

    /// Input contained non-hex characters or odd-length digits.
    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),

    /// Decoded byte length did not match the expected size.
    #[error("length mismatch: expected {expected} bytes, got {actual} bytes")]
    LengthMismatch { expected: usize, actual: usize },
}

fn strip_0x(s: &str) -> Result<&str, HexSerdeError> {
    s.strip_prefix("0x").ok_or(HexSerdeError::MissingPrefix)
}

/// Renders `bytes` as `0x` followed by lowercase hex.
pub fn encode_lower_hex_prefixed(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    out.push_str(&hex::encode(bytes));
    out
}

/// Parses a `0x`-prefixed hex string into exactly 32 bytes.
pub fn decode_hex32_prefixed(s: &str) -> Result<[u8; 32], HexSerdeError> {
    let hex_part = strip_0x(s)?;
    let bytes = hex::decode(hex_part).map_err(|e| HexSerdeError::InvalidHex(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(HexSerdeError::LengthMismatch {
            expected: 32,
            actual: bytes.len(),
        });
    }
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

/// Serde helpers for `[u8; 32]` as 0x-hex.
pub mod hex32 {
    use super::*;

    /// Serialize a `[u8; 32]` as an `"0x..."` lowercase hex string.
    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = encode_lower_hex_prefixed(bytes);
        serializer.serialize_str(&s)
    }

    /// Deserialize a `[u8; 32]` from an `"0x..."` hex string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = String::deserialize(deserializer)?;
        decode_hex32_prefixed(&s).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
    struct Arr32Wrap(#[serde(with = "crate::serde_hex::hex32")] [u8; 32]);

    #[test]
    fn arr32_serializes_lowercase_with_prefix() {
        let mut a = [0u8; 32];
        a[0] = 0xde;
        a[31] = 0xad;
        let s = serde_json::to_string(&Arr32Wrap(a)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&s).unwrap();
        let s_hex = v.as_str().unwrap();
        assert!(s_hex.starts_with("0xde"));
        assert!(s_hex.ends_with("ad"));
        assert_eq!(s_hex.len(), 2 + 64);
        let back: Arr32Wrap = serde_json::from_str(&s).unwrap();
        assert_eq!(back, Arr32Wrap(a));
    }

    #[test]
    fn accepts_uppercase_digits() {
        let s = format!("0x{}", "AB".repeat(32));
        assert_eq!(decode_hex32_prefixed(&s).unwrap(), [0xab; 32]);
    }

    #[test]
    fn rejects_missing_prefix() {
        let s = format!("\"{}\"", "00".repeat(32));
        let err = serde_json::from_str::<Arr32Wrap>(&s).unwrap_err();
        assert!(err.to_string().contains("missing 0x prefix"));
    }

    #[test]
    fn wrong_length_rejected() {
        let s = format!("0x{}", "00".repeat(31));
        assert_eq!(
            decode_hex32_prefixed(&s).unwrap_err(),
            HexSerdeError::LengthMismatch {
                expected: 32,
                actual: 31
            }
        );
    }

    #[test]
    fn invalid_hex_char_rejected() {
        let err = serde_json::from_str::<Arr32Wrap>("\"0xzz\"").unwrap_err();
        assert!(err.to_string().contains("invalid hex encoding"));
    }
}
