use ballot_modules_api::{CallResponse, Context};
use ballot_state::WorkingSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Election, ElectionError};

/// Call actions supported by the module.
#[derive(
    borsh::BorshDeserialize,
    borsh::BorshSerialize,
    Serialize,
    Deserialize,
    Debug,
    PartialEq,
    Eq,
    Clone,
)]
#[serde(rename_all = "snake_case")]
pub enum CallMessage {
    /// Casts the vote of the sender for `candidate`.
    Vote { candidate: String },
}

impl<C: Context> Election<C> {
    /// Records one vote of the sender for `candidate`.
    ///
    /// Preconditions are checked in order: the election is initialized, voting
    /// is still open, the sender hasn't voted yet and the candidate exists.
    pub(crate) fn vote(
        &self,
        candidate: String,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse, ElectionError> {
        let end_block = self
            .end_block
            .get(working_set)?
            .ok_or(ElectionError::NotInitialized)?;

        let current = context.block_height();
        if current > end_block {
            return Err(ElectionError::VotingEnded { current, end_block });
        }

        let voter = context.sender();
        if self.voters.get(voter, working_set)?.unwrap_or_default() {
            return Err(ElectionError::VoterAlreadyVoted(voter.to_string()));
        }

        let Some(tally) = self.candidate_votes.get(candidate.as_str(), working_set)? else {
            return Err(ElectionError::UnknownCandidate(candidate));
        };

        let tally = tally.checked_add(1).ok_or(ElectionError::TallyOverflow)?;
        let number_of_votes = self
            .number_of_votes
            .get(working_set)?
            .unwrap_or_default()
            .checked_add(1)
            .ok_or(ElectionError::TallyOverflow)?;

        self.candidate_votes.set(candidate.as_str(), &tally, working_set);
        self.voters.set(voter, &true, working_set);
        self.number_of_votes.set(&number_of_votes, working_set);

        working_set.add_event(
            "Election: vote",
            &format!("Vote from: {voter} for {candidate} accepted"),
        );
        debug!(%voter, %candidate, tally, "Vote accepted");

        Ok(CallResponse::default())
    }
}
