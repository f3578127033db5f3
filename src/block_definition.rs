//! CAPITALIZED block hashing functions.
//!
//! This module centralizes the functions that define a block identifier so they
//! can be used by the concrete types (`block`, `document`) and by external
//! callers holding the raw fields.
//!
//! Contents:
//! - `HASHED_FIELDS`: the ordered field names that make up the hashed tuple
//! - `CANONICAL_BLOCK_PAYLOAD`
//! - `COMPUTE_DIGEST`
//! - `COMPUTE_BLOCK_HASH`
//!
//! A block's own `hash` field is never an input: only the four fields in
//! `HASHED_FIELDS` are read.

#![allow(non_snake_case)]

use crate::block_hash::BlockHash;
use crate::canonical::{self, CanonicalError};
use crate::transaction::Transaction;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

/// 32-byte hash type.
pub type Hash32 = [u8; 32];

/// Field names of the hashed tuple, in encoding order.
pub const HASHED_FIELDS: [&str; 4] = ["predecessor", "transactions", "difficulty", "nonce"];

/// Canonical encoding of the tuple `(predecessor, transactions, difficulty, nonce)`.
///
/// Encoded as a compact JSON array with sorted object keys, e.g.
/// `["",[{"inputs":[],"outputs":[{"amount":30,"id":73}]}],0,0]`.
pub fn CANONICAL_BLOCK_PAYLOAD(
    predecessor: &str,
    transactions: &[Transaction],
    difficulty: u64,
    nonce: u64,
) -> Result<String, CanonicalError> {
    let values: [Value; 4] = [
        Value::String(predecessor.to_owned()),
        serde_json::to_value(transactions)?,
        Value::from(difficulty),
        Value::from(nonce),
    ];

    let mut out = String::new();
    out.push('[');
    for (i, (field, value)) in HASHED_FIELDS.iter().zip(values.iter()).enumerate() {
        if i > 0 {
            out.push(',');
        }
        canonical::write_canonical_field(&mut out, field, value)?;
    }
    out.push(']');
    Ok(out)
}

/// SHA-256 over the UTF-8 bytes of a canonical payload.
pub fn COMPUTE_DIGEST(canonical: &str) -> Hash32 {
    Sha256::digest(canonical.as_bytes()).into()
}

/// Compute the block identifier from the four hashed fields.
///
/// `SHA256(CANONICAL_BLOCK_PAYLOAD(..))`, rendered by `BlockHash` as `0x` + 64 hex digits.
pub fn COMPUTE_BLOCK_HASH(
    predecessor: &str,
    transactions: &[Transaction],
    difficulty: u64,
    nonce: u64,
) -> Result<BlockHash, CanonicalError> {
    let payload = CANONICAL_BLOCK_PAYLOAD(predecessor, transactions, difficulty, nonce)?;
    debug!(canonical = %payload, "encoded block payload");
    let digest = COMPUTE_DIGEST(&payload);
    debug!(raw = ?digest, "block digest");
    Ok(BlockHash(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TxOutput;

    const SAMPLE_CANONICAL: &str = r#"["",[{"inputs":[],"outputs":[{"amount":30,"id":73}]}],0,0]"#;
    const SAMPLE_HASH: &str = "0xdcb3d5ee85f43e20e5844b787738941cc780eaac8200cb6734ca13cb4f8d1f85";

    fn sample_txs() -> Vec<Transaction> {
        vec![Transaction::coinbase(vec![TxOutput::new(73, 30)])]
    }

    #[test]
    fn sample_payload_matches_reference_text() {
        let payload = CANONICAL_BLOCK_PAYLOAD("", &sample_txs(), 0, 0).unwrap();
        assert_eq!(payload, SAMPLE_CANONICAL);
    }

    #[test]
    fn sample_hash_matches_reference_digest() {
        let h = COMPUTE_BLOCK_HASH("", &sample_txs(), 0, 0).unwrap();
        assert_eq!(h.to_string(), SAMPLE_HASH);
        assert_eq!(h.0, COMPUTE_DIGEST(SAMPLE_CANONICAL));
    }

    #[test]
    fn empty_transactions_encode_as_empty_array() {
        let payload = CANONICAL_BLOCK_PAYLOAD("0xab", &[], 3, 42).unwrap();
        assert_eq!(payload, r#"["0xab",[],3,42]"#);
    }

    #[test]
    fn tuple_positions_are_not_interchangeable() {
        let a = COMPUTE_BLOCK_HASH("", &[], 1, 2).unwrap();
        let b = COMPUTE_BLOCK_HASH("", &[], 2, 1).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn predecessor_is_escaped() {
        let payload = CANONICAL_BLOCK_PAYLOAD("a\"b", &[], 0, 0).unwrap();
        assert_eq!(payload, r#"["a\"b",[],0,0]"#);
    }

    #[test]
    fn digest_is_plain_sha256() {
        // sha256("") is a well-known constant.
        assert_eq!(
            hex::encode(COMPUTE_DIGEST("")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
