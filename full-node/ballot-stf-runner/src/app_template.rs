use anyhow::{ensure, Context as _};
use ballot_modules_api::{Context, Genesis, Module, ModulePrefix, Spec};
use ballot_state::{StateCheckpoint, StateValue, Storage, WorkingSet};
use tracing::{debug, info, warn};

use crate::transaction::{BatchReceipt, Transaction, TxEffect, TxReceipt};

/// Applies transactions to a module.
///
/// Every transaction runs in its own revertable working set: the writes of a
/// successful call are kept, those of a failed call are discarded. Kept writes
/// reach the storage on [`AppTemplate::commit`].
///
/// Block heights are supplied by the caller with each transaction and must
/// never decrease. The highest applied height is kept in state, so it
/// survives a restart.
pub struct AppTemplate<C: Context, M> {
    /// The storage transactions are committed to.
    pub current_storage: C::Storage,
    /// The module transactions are dispatched to.
    pub module: M,
    block_height: StateValue<u64>,
    checkpoint: Option<StateCheckpoint<C::Storage>>,
}

impl<C, M> AppTemplate<C, M>
where
    C: Context,
    M: Module<Context = C>,
{
    /// Creates a new app on top of `storage`.
    pub fn new(storage: C::Storage, module: M) -> Self {
        Self {
            current_storage: storage,
            module,
            block_height: StateValue::new(
                ModulePrefix::new_storage(module_path!(), "AppTemplate", "block_height").into(),
            ),
            checkpoint: None,
        }
    }

    /// Runs the genesis of the module and commits it, returning the new state root.
    ///
    /// Nothing is written if the genesis fails.
    pub fn init_chain(&mut self, config: &M::Config) -> anyhow::Result<[u8; 32]> {
        let mut working_set = WorkingSet::new(self.current_storage.clone());

        Genesis::genesis(&self.module, config, &mut working_set)
            .context("Module genesis failed")?;

        let root = self
            .current_storage
            .validate_and_commit(working_set.checkpoint().freeze())?;
        info!("Chain initialized, state root 0x{}", hex::encode(root));
        Ok(root)
    }

    /// Applies a single transaction. Its writes are kept only if the module accepts it.
    ///
    /// A transaction from a block lower than the last applied one is reverted
    /// without reaching the module.
    pub fn apply_tx(
        &mut self,
        tx: Transaction<<C as Spec>::Address, M::CallMessage>,
    ) -> TxReceipt {
        let checkpoint = self
            .checkpoint
            .take()
            .unwrap_or_else(|| StateCheckpoint::new(self.current_storage.clone()));
        let mut working_set = checkpoint.to_revertable();

        if let Err(e) = self.advance_block_height(tx.block_height, &mut working_set) {
            warn!("Transaction rejected by the host: {}", e);
            self.checkpoint = Some(working_set.revert());
            return TxReceipt {
                effect: TxEffect::Reverted {
                    reason: e.to_string(),
                },
                events: Vec::new(),
            };
        }

        // Keep the new height even if the module rejects the call.
        let mut working_set = working_set.checkpoint().to_revertable();

        let context = C::new(tx.sender, tx.block_height);
        debug!(
            sender = %context.sender(),
            block_height = tx.block_height,
            "Applying transaction {:?}",
            tx.call
        );

        let (checkpoint, receipt) = match self.module.call(tx.call, &context, &mut working_set) {
            Ok(_) => {
                let events = working_set.take_events();
                let receipt = TxReceipt {
                    effect: TxEffect::Successful,
                    events,
                };
                (working_set.checkpoint(), receipt)
            }
            Err(e) => {
                warn!(sender = %context.sender(), "Transaction reverted: {}", e);
                let receipt = TxReceipt {
                    effect: TxEffect::Reverted {
                        reason: e.to_string(),
                    },
                    events: Vec::new(),
                };
                (working_set.revert(), receipt)
            }
        };

        self.checkpoint = Some(checkpoint);
        receipt
    }

    fn advance_block_height(
        &self,
        block_height: u64,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> anyhow::Result<()> {
        if let Some(last) = self.block_height.get(working_set)? {
            ensure!(
                block_height >= last,
                "Block height {} is lower than the last applied height {}",
                block_height,
                last
            );
        }
        self.block_height.set(&block_height, working_set);
        Ok(())
    }

    /// Returns the highest block height committed so far, if any transaction was applied.
    pub fn block_height(&self) -> anyhow::Result<Option<u64>> {
        let mut working_set = WorkingSet::new(self.current_storage.clone());
        Ok(self.block_height.get(&mut working_set)?)
    }

    /// Writes the changes of the applied transactions to storage and returns the new state root.
    pub fn commit(&mut self) -> anyhow::Result<[u8; 32]> {
        let Some(checkpoint) = self.checkpoint.take() else {
            return self.current_storage.get_state_root();
        };
        self.current_storage.validate_and_commit(checkpoint.freeze())
    }

    /// Applies the transactions in order, then commits.
    pub fn apply_batch(
        &mut self,
        txs: Vec<Transaction<<C as Spec>::Address, M::CallMessage>>,
    ) -> anyhow::Result<BatchReceipt> {
        let tx_receipts: Vec<TxReceipt> = txs.into_iter().map(|tx| self.apply_tx(tx)).collect();
        let successful = tx_receipts.iter().filter(|r| r.is_successful()).count();

        let state_root = hex::encode(self.commit()?);
        info!(
            "Applied batch of {} transactions, {} successful, state root 0x{}",
            tx_receipts.len(),
            successful,
            state_root
        );

        Ok(BatchReceipt {
            tx_receipts,
            state_root,
        })
    }

    /// Runs a read-only query against the committed state.
    pub fn query<R>(&self, query: impl FnOnce(&M, &mut WorkingSet<C::Storage>) -> R) -> R {
        let mut working_set = WorkingSet::new(self.current_storage.clone());
        query(&self.module, &mut working_set)
    }
}
