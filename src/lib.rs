//! block-hasher crate library entry point.
//!
//! This crate computes deterministic block identifiers: the fields
//! `(predecessor, transactions, difficulty, nonce)` are encoded as canonical
//! JSON and hashed with SHA-256, giving a `0x`-prefixed lowercase hex digest.
//!
//! Modules:
//! - `serde_hex`: Serde helpers to encode/decode 32-byte digests as 0x-prefixed hex.
//! - `canonical`: sorted-key, compact, ASCII-only JSON encoding.
//! - `block_definition`: CAPITALIZED functions defining the hashed payload and digest.
//! - `block_hash`, `transaction`, `block`: core types; `Block::compute_hash()` is the main entry.
//! - `config`, `document`: input envelopes and per-document checks used by the CLI.

pub mod serde_hex;
pub mod canonical;
pub mod block_definition;
pub mod block_hash;
pub mod transaction;
pub mod block;
pub mod config;
pub mod document;

pub use block::{Block, BlockError, GenesisError};
pub use block_hash::BlockHash;
pub use canonical::{CanonicalError, canonical_json};
pub use config::RunOptions;
pub use document::{BlockDocument, DocumentKind, HashReport};
pub use transaction::{Transaction, TransactionError, TxOutput};
