use std::collections::HashSet;

use ballot_modules_api::Context;
use ballot_state::WorkingSet;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Election, ElectionError};

/// Initial configuration of the election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Last block height at which votes are accepted.
    pub end_block: u64,
    /// Names of the candidates, in display order.
    pub candidates: Vec<String>,
}

impl ElectionConfig {
    fn validate(&self) -> Result<(), ElectionError> {
        if self.candidates.is_empty() {
            return Err(ElectionError::InvalidConfiguration(
                "the candidate list is empty".to_owned(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.candidates.len());
        for name in &self.candidates {
            if name.is_empty() {
                return Err(ElectionError::InvalidConfiguration(
                    "candidate names cannot be empty".to_owned(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(ElectionError::InvalidConfiguration(format!(
                    "duplicate candidate: {name}"
                )));
            }
        }

        Ok(())
    }
}

impl<C: Context> Election<C> {
    pub(crate) fn init_module(
        &self,
        config: &ElectionConfig,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<(), ElectionError> {
        if self.end_block.get(working_set)?.is_some() {
            return Err(ElectionError::AlreadyInitialized);
        }
        config.validate()?;

        self.end_block.set(&config.end_block, working_set);
        self.candidates.set(&config.candidates, working_set);
        for name in &config.candidates {
            self.candidate_votes.set(name, &0, working_set);
        }
        self.number_of_votes.set(&0, working_set);

        working_set.add_event(
            "Election: init",
            &format!(
                "{} candidates, voting open until block {}",
                config.candidates.len(),
                config.end_block
            ),
        );
        info!(
            end_block = config.end_block,
            candidates = config.candidates.len(),
            "Election initialized"
        );

        Ok(())
    }
}
