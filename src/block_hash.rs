//! `BlockHash`: the 32-byte block identifier, written as `0x` + 64 lowercase hex digits.

use crate::serde_hex::{self, HexSerdeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SHA-256 digest identifying a block.
///
/// JSON encodes it as a `0x`-prefixed lowercase hex string. Parsing accepts
/// either case for the hex digits but always requires the prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockHash(#[serde(with = "crate::serde_hex::hex32")] pub [u8; 32]);

impl BlockHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Number of leading `0` hex digits in the rendered form (after `0x`).
    pub fn leading_zero_digits(&self) -> u32 {
        let mut total = 0u32;
        for b in self.0 {
            if b == 0 {
                total += 2;
            } else {
                if b < 0x10 {
                    total += 1;
                }
                break;
            }
        }
        total
    }
}

impl From<[u8; 32]> for BlockHash {
    fn from(bytes: [u8; 32]) -> Self {
        BlockHash(bytes)
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serde_hex::encode_lower_hex_prefixed(&self.0))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({self})")
    }
}

impl FromStr for BlockHash {
    type Err = HexSerdeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_hex::decode_hex32_prefixed(s).map(BlockHash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed_lowercase() {
        let h = BlockHash([0xabu8; 32]);
        let s = h.to_string();
        assert_eq!(s.len(), 66);
        assert!(s.starts_with("0x"));
        assert!(s[2..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn parses_its_own_display() {
        let mut bytes = [0u8; 32];
        bytes[3] = 0x7f;
        let h = BlockHash(bytes);
        assert_eq!(h.to_string().parse::<BlockHash>().unwrap(), h);
    }

    #[test]
    fn parse_requires_prefix() {
        let err = "00".repeat(32).parse::<BlockHash>().unwrap_err();
        assert_eq!(err, HexSerdeError::MissingPrefix);
    }

    #[test]
    fn leading_zero_digits_counts_nibbles() {
        let mut b = [0u8; 32];
        assert_eq!(BlockHash(b).leading_zero_digits(), 64);
        b[0] = 0x0f;
        assert_eq!(BlockHash(b).leading_zero_digits(), 1);
        b[0] = 0x10;
        assert_eq!(BlockHash(b).leading_zero_digits(), 0);
        b = [0u8; 32];
        b[1] = 0x05;
        assert_eq!(BlockHash(b).leading_zero_digits(), 3);
    }

    #[test]
    fn json_is_a_hex_string() {
        let h = BlockHash([1u8; 32]);
        let s = serde_json::to_string(&h).unwrap();
        assert_eq!(s, format!("\"0x{}\"", "01".repeat(32)));
        let back: BlockHash = serde_json::from_str(&s).unwrap();
        assert_eq!(back, h);
    }
}
