use ballot_modules_api::Context;
use ballot_state::WorkingSet;
use serde::{Deserialize, Serialize};

use crate::{Election, ElectionError};

/// Lifecycle of the election at a given block height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionStatus {
    Uninitialized,
    /// Votes are accepted.
    Open { end_block: u64 },
    /// The deadline has passed. Tallies are final.
    Closed { end_block: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTally {
    pub name: String,
    pub votes: u32,
}

/// Final tallies of a closed election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsResponse {
    /// Every candidate, in configured order.
    pub tallies: Vec<CandidateTally>,
    /// Candidates with the most votes. Several on a tie, none when nobody voted.
    pub leaders: Vec<String>,
    pub number_of_votes: u64,
}

impl<C: Context> Election<C> {
    /// Returns the votes cast for `candidate`, or 0 if it has no tally.
    pub fn get_candidate_votes(
        &self,
        candidate: &str,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<u32, ElectionError> {
        Ok(self
            .candidate_votes
            .get(candidate, working_set)?
            .unwrap_or_default())
    }

    pub fn end_block(
        &self,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<Option<u64>, ElectionError> {
        Ok(self.end_block.get(working_set)?)
    }

    /// Returns the configured candidates, or an empty list before genesis.
    pub fn candidates(
        &self,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<Vec<String>, ElectionError> {
        Ok(self.candidates.get(working_set)?.unwrap_or_default())
    }

    pub fn has_voted(
        &self,
        voter: &C::Address,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<bool, ElectionError> {
        Ok(self.voters.get(voter, working_set)?.unwrap_or_default())
    }

    pub fn number_of_votes(
        &self,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<u64, ElectionError> {
        Ok(self.number_of_votes.get(working_set)?.unwrap_or_default())
    }

    pub fn status(
        &self,
        block_height: u64,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<ElectionStatus, ElectionError> {
        let status = match self.end_block.get(working_set)? {
            None => ElectionStatus::Uninitialized,
            Some(end_block) if block_height <= end_block => ElectionStatus::Open { end_block },
            Some(end_block) => ElectionStatus::Closed { end_block },
        };
        Ok(status)
    }

    /// Returns the final tallies. Only available once voting has closed at `block_height`.
    pub fn results(
        &self,
        block_height: u64,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<ResultsResponse, ElectionError> {
        match self.status(block_height, working_set)? {
            ElectionStatus::Uninitialized => return Err(ElectionError::NotInitialized),
            ElectionStatus::Open { .. } => return Err(ElectionError::VotingInProgress),
            ElectionStatus::Closed { .. } => {}
        }

        let mut tallies = Vec::new();
        for name in self.candidates(working_set)? {
            let votes = self.get_candidate_votes(&name, working_set)?;
            tallies.push(CandidateTally { name, votes });
        }

        let max_votes = tallies.iter().map(|t| t.votes).max().unwrap_or_default();
        let leaders = tallies
            .iter()
            .filter(|t| max_votes > 0 && t.votes == max_votes)
            .map(|t| t.name.clone())
            .collect();

        Ok(ResultsResponse {
            tallies,
            leaders,
            number_of_votes: self.number_of_votes(working_set)?,
        })
    }
}
