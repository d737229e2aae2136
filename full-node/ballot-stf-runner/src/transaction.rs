use ballot_state::Event;
use serde::{Deserialize, Serialize};

/// A call to a module, as authenticated and scheduled by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction<A, M> {
    /// The caller.
    pub sender: A,
    /// Height of the block the transaction is included in.
    pub block_height: u64,
    /// The message passed to the module.
    pub call: M,
}

/// Outcome of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxEffect {
    /// The writes of the transaction were kept.
    Successful,
    /// The module rejected the transaction. None of its writes were kept.
    Reverted {
        /// The error returned by the module.
        reason: String,
    },
}

/// Receipt of a single transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Outcome of the transaction.
    pub effect: TxEffect,
    /// Events emitted by the transaction. Always empty for a reverted transaction.
    pub events: Vec<Event>,
}

impl TxReceipt {
    /// Returns `true` if the writes of the transaction were kept.
    pub fn is_successful(&self) -> bool {
        self.effect == TxEffect::Successful
    }
}

/// Receipts of a batch, along with the state root after the batch was committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReceipt {
    /// One receipt per transaction, in execution order.
    pub tx_receipts: Vec<TxReceipt>,
    /// Hex encoded state root.
    pub state_root: String,
}
