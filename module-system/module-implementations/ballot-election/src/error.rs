use ballot_modules_api::ModuleError;
use ballot_state::StateError;

/// Reasons for which the election rejects a call. A rejected call leaves no trace in the state.
#[derive(Debug, thiserror::Error)]
pub enum ElectionError {
    #[error("Voting ended at block {end_block}, current block is {current}")]
    VotingEnded { current: u64, end_block: u64 },
    #[error("Voter {0} already voted")]
    VoterAlreadyVoted(String),
    #[error("Unknown candidate: {0}")]
    UnknownCandidate(String),
    #[error("Invalid election configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Election is not initialized")]
    NotInitialized,
    #[error("Election is already initialized")]
    AlreadyInitialized,
    #[error("Voting is still in progress")]
    VotingInProgress,
    #[error("Vote count overflow")]
    TallyOverflow,
    #[error("Storage error: {0}")]
    StorageError(#[from] StateError),
}

impl From<ElectionError> for ModuleError {
    fn from(err: ElectionError) -> Self {
        ModuleError::ModuleError(anyhow::Error::new(err))
    }
}
