//! Block record and its identifier.
//!
//! `Block::compute_hash()` reads only the four hashed fields and defers to
//! `COMPUTE_BLOCK_HASH`. The optional `hash` field is metadata carried with the
//! record and is kept as raw JSON; only `verify_hash()` interprets it, so a
//! placeholder or malformed value never stops a block from being hashed.
//!
//! Parsing via `from_json`/`from_value` is the validation boundary: field types
//! are enforced there, unknown fields are rejected, and errors name the path of
//! the offending field (e.g. `transactions[0].outputs[0].id`).

use crate::block_definition as definitions;
use crate::block_hash::BlockHash;
use crate::serde_hex::HexSerdeError;
use crate::canonical::CanonicalError;
use crate::transaction::{self, Transaction, TransactionError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

/// A block as submitted by a producer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Block {
    /// Identifier of the prior block; empty for a genesis block.
    pub predecessor: String,
    /// Ordered transactions.
    pub transactions: Vec<Transaction>,
    /// Mining difficulty target.
    pub difficulty: u64,
    /// Proof-of-work counter.
    pub nonce: u64,
    /// Claimed identifier as submitted, normally a `0x` hex string. Never part of
    /// the hashed payload and not validated until `verify_hash()`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Value>,
}

impl Block {
    /// Build a block without a claimed hash.
    pub fn new(
        predecessor: impl Into<String>,
        transactions: Vec<Transaction>,
        difficulty: u64,
        nonce: u64,
    ) -> Self {
        Self {
            predecessor: predecessor.into(),
            transactions,
            difficulty,
            nonce,
            hash: None,
        }
    }

    /// Parse a block from JSON text.
    pub fn from_json(s: &str) -> Result<Self, BlockError> {
        let mut de = serde_json::Deserializer::from_str(s);
        let block = serde_path_to_error::deserialize(&mut de).map_err(BlockError::from_path_error)?;
        de.end().map_err(|source| BlockError::Parse {
            path: ROOT_PATH.to_owned(),
            source,
        })?;
        Ok(block)
    }

    /// Parse a block from an already decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, BlockError> {
        serde_path_to_error::deserialize(value).map_err(BlockError::from_path_error)
    }

    /// Attach a claimed hash.
    pub fn with_claimed_hash(mut self, hash: BlockHash) -> Self {
        self.hash = Some(Value::String(hash.to_string()));
        self
    }

    /// Interprets the `hash` metadata field.
    ///
    /// Absent, `null`, and the empty-string placeholder all mean "no claim".
    pub fn claimed_hash(&self) -> Result<Option<BlockHash>, BlockError> {
        match &self.hash {
            None => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => s.parse().map(Some).map_err(|e: HexSerdeError| {
                BlockError::InvalidClaimedHash {
                    found: s.clone(),
                    reason: e.to_string(),
                }
            }),
            Some(other) => Err(BlockError::InvalidClaimedHash {
                found: other.to_string(),
                reason: "expected a 0x hex string".to_owned(),
            }),
        }
    }

    /// The canonical encoding of `(predecessor, transactions, difficulty, nonce)`.
    pub fn canonical_payload(&self) -> Result<String, BlockError> {
        Ok(definitions::CANONICAL_BLOCK_PAYLOAD(
            &self.predecessor,
            &self.transactions,
            self.difficulty,
            self.nonce,
        )?)
    }

    /// Computes the block identifier from the four hashed fields.
    pub fn compute_hash(&self) -> Result<BlockHash, BlockError> {
        trace!(
            predecessor = %self.predecessor,
            transactions = self.transactions.len(),
            difficulty = self.difficulty,
            nonce = self.nonce,
            "hashing block"
        );
        Ok(definitions::COMPUTE_BLOCK_HASH(
            &self.predecessor,
            &self.transactions,
            self.difficulty,
            self.nonce,
        )?)
    }

    /// Checks the claimed `hash` against the computed one and returns the computed hash.
    pub fn verify_hash(&self) -> Result<BlockHash, BlockError> {
        let claimed = self.claimed_hash()?.ok_or(BlockError::MissingClaimedHash)?;
        let computed = self.compute_hash()?;
        if claimed != computed {
            return Err(BlockError::HashMismatch { claimed, computed });
        }
        Ok(computed)
    }

    /// True when the block has the shape of a genesis block.
    pub fn is_genesis(&self) -> bool {
        self.validate_genesis().is_ok()
    }

    /// Validates genesis rules: empty predecessor, zero difficulty, zero nonce.
    pub fn validate_genesis(&self) -> Result<(), GenesisError> {
        if !self.predecessor.is_empty() {
            return Err(GenesisError::Predecessor(self.predecessor.clone()));
        }
        if self.difficulty != 0 {
            return Err(GenesisError::NonZero {
                field: "difficulty",
                found: self.difficulty,
            });
        }
        if self.nonce != 0 {
            return Err(GenesisError::NonZero {
                field: "nonce",
                found: self.nonce,
            });
        }
        Ok(())
    }

    /// True when `hash` has at least `difficulty` leading zero hex digits.
    pub fn meets_difficulty(&self, hash: &BlockHash) -> bool {
        u64::from(hash.leading_zero_digits()) >= self.difficulty
    }

    /// Checks transaction amounts: positive totals per transaction and a balanced block.
    pub fn validate_transactions(&self) -> Result<(), TransactionError> {
        transaction::validate_transactions(&self.transactions)
    }

    /// Computes the hash and checks it against this block's own difficulty.
    pub fn validate_work(&self) -> Result<BlockHash, BlockError> {
        let hash = self.compute_hash()?;
        if !self.meets_difficulty(&hash) {
            return Err(BlockError::InsufficientWork {
                difficulty: self.difficulty,
                leading_zeros: hash.leading_zero_digits(),
            });
        }
        Ok(hash)
    }
}

/// Violations of the genesis block rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenesisError {
    #[error("expected predecessor field to be empty string, found {0:?}")]
    Predecessor(String),

    #[error("expected {field} field to be 0, found {found}")]
    NonZero { field: &'static str, found: u64 },
}

const ROOT_PATH: &str = "<root>";

/// Errors that can be returned by block parsing, hashing, and checks.
#[derive(Debug, Error)]
pub enum BlockError {
    /// The input document does not describe a well-typed block. `path` names
    /// the offending field, or `<root>` for errors on the block object itself.
    #[error("invalid block at `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A hashed field has no canonical encoding.
    #[error(transparent)]
    Canonical(#[from] CanonicalError),

    /// Verification was requested but the block carries no claimed hash.
    #[error("block has no hash field to verify")]
    MissingClaimedHash,

    /// The `hash` field is present but is not a `0x` + 64 hex digit string.
    #[error("invalid hash field {found}: {reason}")]
    InvalidClaimedHash { found: String, reason: String },

    /// The claimed `hash` differs from the computed one.
    #[error("hash mismatch: claimed {claimed} != computed {computed}")]
    HashMismatch {
        claimed: BlockHash,
        computed: BlockHash,
    },

    /// The block violates a genesis rule.
    #[error(transparent)]
    Genesis(#[from] GenesisError),

    /// Transaction amounts are not positive or do not balance.
    #[error(transparent)]
    Transactions(#[from] TransactionError),

    /// The digest has fewer leading zero hex digits than the block's difficulty.
    #[error("insufficient work: difficulty {difficulty} needs that many leading zeros, hash has {leading_zeros}")]
    InsufficientWork { difficulty: u64, leading_zeros: u32 },
}

impl BlockError {
    fn from_path_error(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = match err.path().to_string() {
            p if p == "." => ROOT_PATH.to_owned(),
            p => p,
        };
        BlockError::Parse {
            path,
            source: err.into_inner(),
        }
    }

    /// Field path for parse errors.
    pub fn path(&self) -> Option<&str> {
        match self {
            BlockError::Parse { path, .. } => Some(path),
            BlockError::Canonical(e) => e.path(),
            _ => None,
        }
    }
}
