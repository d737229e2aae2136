use std::path::Path;

use anyhow::Context as _;
use ballot_election::{CallMessage, CandidateTally, Election, ElectionConfig, ElectionStatus};
use ballot_modules_api::default_context::DefaultContext;
use ballot_modules_api::Address;
use ballot_state::{NativeStorage, Storage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{from_json_path, AppTemplate, RunnerConfig, Transaction, TxReceipt};

/// The app run by the `ballot-node` binary.
pub type ElectionApp = AppTemplate<DefaultContext, Election<DefaultContext>>;

/// What `ballot-node` prints after applying a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeReport {
    /// Hex encoded state root after the batch.
    pub state_root: String,
    /// Highest block height applied, including earlier runs on the same storage.
    pub block_height: u64,
    /// Status of the election at `block_height`.
    pub status: ElectionStatus,
    /// Every candidate with its votes, in configured order.
    pub tallies: Vec<CandidateTally>,
    /// Total of accepted votes.
    pub number_of_votes: u64,
    /// One receipt per transaction of this run.
    pub receipts: Vec<TxReceipt>,
}

/// Opens the storage, runs the genesis if the storage is empty and applies `txs`.
pub fn run_election(
    config: RunnerConfig<ElectionConfig>,
    txs: Vec<Transaction<Address, CallMessage>>,
) -> anyhow::Result<NodeReport> {
    let storage = NativeStorage::with_config(config.storage).context("Failed to open storage")?;
    let fresh = storage.is_empty();
    let mut app = ElectionApp::new(storage, Election::default());

    if fresh {
        app.init_chain(&config.genesis)?;
    } else {
        info!("Storage is not empty, skipping genesis");
    }

    let batch = app.apply_batch(txs)?;
    let block_height = app.block_height()?.unwrap_or_default();

    let (status, tallies, number_of_votes) = app.query(|election, working_set| {
        let status = election.status(block_height, working_set)?;
        let mut tallies = Vec::new();
        for name in election.candidates(working_set)? {
            let votes = election.get_candidate_votes(&name, working_set)?;
            tallies.push(CandidateTally { name, votes });
        }
        let number_of_votes = election.number_of_votes(working_set)?;
        anyhow::Ok((status, tallies, number_of_votes))
    })?;

    Ok(NodeReport {
        state_root: batch.state_root,
        block_height,
        status,
        tallies,
        number_of_votes,
        receipts: batch.tx_receipts,
    })
}

/// Reads the transactions of `path`, or none when no path is given.
pub fn load_transactions(
    path: Option<&Path>,
) -> anyhow::Result<Vec<Transaction<Address, CallMessage>>> {
    match path {
        Some(path) => from_json_path(path).context("Failed to read transactions"),
        None => Ok(Vec::new()),
    }
}
