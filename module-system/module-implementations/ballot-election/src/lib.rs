pub mod call;
mod error;
pub mod genesis;
pub mod query;


use ballot_modules_api::{
    AddressTrait, CallResponse, Context, Module, ModuleError, ModuleInfo, ModulePrefix, Spec,
};
use ballot_state::{StateMap, StateValue, WorkingSet};
pub use call::CallMessage;
pub use error::ElectionError;
pub use genesis::ElectionConfig;
pub use query::{CandidateTally, ElectionStatus, ResultsResponse};

const MODULE_NAME: &str = "Election";

/// An election with a fixed list of candidates. Every address may vote once,
/// up to and including the `end_block` height.
#[derive(Clone, Debug)]
pub struct Election<C: Context> {
    /// Address of the module.
    pub address: C::Address,

    /// Last block height at which votes are accepted. Present once the election is initialized.
    pub(crate) end_block: StateValue<u64>,

    /// Candidates in the order they were configured.
    pub(crate) candidates: StateValue<Vec<String>>,

    /// Tally of every configured candidate, and of nothing else.
    pub(crate) candidate_votes: StateMap<String, u32>,

    /// Addresses that already voted. Entries are never removed.
    pub(crate) voters: StateMap<C::Address, bool>,

    /// Total of accepted votes, always equal to the sum of `candidate_votes`.
    pub(crate) number_of_votes: StateValue<u64>,
}

fn storage_prefix(storage_name: &'static str) -> ballot_state::Prefix {
    ModulePrefix::new_storage(module_path!(), MODULE_NAME, storage_name).into()
}

impl<C: Context> Default for Election<C> {
    fn default() -> Self {
        let module_prefix = ModulePrefix::new_module(module_path!(), MODULE_NAME);
        Self {
            address: C::Address::contract(module_prefix.hash::<C>()),
            end_block: StateValue::new(storage_prefix("end_block")),
            candidates: StateValue::new(storage_prefix("candidates")),
            candidate_votes: StateMap::new(storage_prefix("candidate_votes")),
            voters: StateMap::new(storage_prefix("voters")),
            number_of_votes: StateValue::new(storage_prefix("number_of_votes")),
        }
    }
}

impl<C: Context> ModuleInfo for Election<C> {
    type Context = C;

    fn address(&self) -> &<C as Spec>::Address {
        &self.address
    }

    fn prefix(&self) -> ModulePrefix {
        ModulePrefix::new_module(module_path!(), MODULE_NAME)
    }
}

impl<C: Context> Module for Election<C> {
    type Context = C;

    type Config = ElectionConfig;

    type CallMessage = CallMessage;

    fn genesis(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<(), ModuleError> {
        Ok(self.init_module(config, working_set)?)
    }

    fn call(
        &self,
        msg: Self::CallMessage,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse, ModuleError> {
        match msg {
            CallMessage::Vote { candidate } => Ok(self.vote(candidate, context, working_set)?),
        }
    }
}
