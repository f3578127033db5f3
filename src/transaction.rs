//! Transaction records carried in a block.
//!
//! Inputs reference previously created outputs and share the `{id, amount}`
//! shape with outputs. Unknown fields are rejected when parsing so that no part
//! of a submitted transaction can be left out of the block hash.
//!
//! `validate_transactions` checks amounts within one block: every transaction
//! spends and creates a positive total, and the block's input total equals its
//! output total.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An output created by a transaction, or a reference to one when used as an input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TxOutput {
    pub id: u64,
    pub amount: u64,
}

impl TxOutput {
    pub fn new(id: u64, amount: u64) -> Self {
        Self { id, amount }
    }
}

/// Transfer consuming `inputs` and creating `outputs`. Order is significant for hashing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    pub inputs: Vec<TxOutput>,
    pub outputs: Vec<TxOutput>,
}

impl Transaction {
    pub fn new(inputs: Vec<TxOutput>, outputs: Vec<TxOutput>) -> Self {
        Self { inputs, outputs }
    }

    /// A transaction with no inputs, as found in a genesis block.
    pub fn coinbase(outputs: Vec<TxOutput>) -> Self {
        Self {
            inputs: Vec::new(),
            outputs,
        }
    }

    /// Sum of input amounts, `None` on overflow.
    pub fn input_total(&self) -> Option<u64> {
        sum_amounts(&self.inputs)
    }

    /// Sum of output amounts, `None` on overflow.
    pub fn output_total(&self) -> Option<u64> {
        sum_amounts(&self.outputs)
    }
}

fn sum_amounts(items: &[TxOutput]) -> Option<u64> {
    items.iter().try_fold(0u64, |acc, o| acc.checked_add(o.amount))
}

/// Amount rule violations found by `validate_transactions`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// A transaction's inputs or outputs add up to zero.
    #[error("transactions[{index}]: {side} total must be positive")]
    ZeroTotal { index: usize, side: &'static str },

    /// Amounts do not fit in a u64.
    #[error("transactions[{index}]: {side} total overflows")]
    Overflow { index: usize, side: &'static str },

    /// The block spends a different amount than it creates.
    #[error("unbalanced transactions: inputs total {inputs}, outputs total {outputs}")]
    Unbalanced { inputs: u64, outputs: u64 },
}

/// Checks that every transaction moves a positive amount and that the inputs
/// of all transactions add up to their outputs.
pub fn validate_transactions(transactions: &[Transaction]) -> Result<(), TransactionError> {
    let mut inputs = 0u64;
    let mut outputs = 0u64;
    for (index, tx) in transactions.iter().enumerate() {
        for (side, total, running) in [
            ("inputs", tx.input_total(), &mut inputs),
            ("outputs", tx.output_total(), &mut outputs),
        ] {
            let total = total.ok_or(TransactionError::Overflow { index, side })?;
            if total == 0 {
                return Err(TransactionError::ZeroTotal { index, side });
            }
            *running = running
                .checked_add(total)
                .ok_or(TransactionError::Overflow { index, side })?;
        }
    }
    if inputs != outputs {
        return Err(TransactionError::Unbalanced { inputs, outputs });
    }
    Ok(())
}
