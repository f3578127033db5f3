//! Block documents as read from an input stream.
//!
//! A document is either a bare block object or a one-key envelope:
//! - `{"init": {...}}`: a genesis block; genesis rules are enforced.
//! - `{"block": {...}}`: any block.
//!
//! `BlockDocument::process` hashes the block and runs the checks selected in
//! `RunOptions`, producing a `HashReport`.

use crate::block::{Block, BlockError};
use crate::block_hash::BlockHash;
use crate::config::RunOptions;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Envelope the block arrived in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Init,
    Block,
    Bare,
}

/// A parsed block together with its envelope kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockDocument {
    pub kind: DocumentKind,
    pub block: Block,
}

/// Outcome of processing one document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HashReport {
    pub kind: DocumentKind,
    pub hash: BlockHash,
    /// Canonical encoding of the hashed fields, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    /// Whether the claimed hash was checked (and matched).
    pub verified: bool,
    pub leading_zero_digits: u32,
}

impl BlockDocument {
    /// Parse a decoded JSON value, unwrapping an `init`/`block` envelope if present.
    pub fn from_value(value: Value) -> Result<Self, BlockError> {
        let (kind, inner) = split_envelope(value);
        let block = Block::from_value(inner)?;
        Ok(Self { kind, block })
    }

    /// Hash the block and apply the checks selected by `opts`.
    pub fn process(&self, opts: &RunOptions) -> Result<HashReport, BlockError> {
        if self.kind == DocumentKind::Init {
            self.block.validate_genesis()?;
        }
        if opts.check_transactions {
            self.block.validate_transactions()?;
        }

        let hash = if opts.verify {
            self.block.verify_hash()?
        } else {
            self.block.compute_hash()?
        };

        if opts.check_work && !self.block.meets_difficulty(&hash) {
            return Err(BlockError::InsufficientWork {
                difficulty: self.block.difficulty,
                leading_zeros: hash.leading_zero_digits(),
            });
        }

        let canonical = if opts.include_canonical {
            Some(self.block.canonical_payload()?)
        } else {
            None
        };

        debug!(kind = ?self.kind, %hash, "processed block document");
        Ok(HashReport {
            kind: self.kind,
            hash,
            canonical,
            verified: opts.verify,
            leading_zero_digits: hash.leading_zero_digits(),
        })
    }
}

fn split_envelope(value: Value) -> (DocumentKind, Value) {
    if let Value::Object(map) = &value {
        if map.len() == 1 {
            for (key, kind) in [("init", DocumentKind::Init), ("block", DocumentKind::Block)] {
                if let Some(inner) = map.get(key) {
                    return (kind, inner.clone());
                }
            }
        }
    }
    (DocumentKind::Bare, value)
}
