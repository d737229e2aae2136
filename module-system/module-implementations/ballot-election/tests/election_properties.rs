use std::collections::HashSet;

use ballot_election::{CallMessage, Election, ElectionConfig, ElectionError};
use ballot_modules_api::default_context::DefaultContext;
use ballot_modules_api::{Address, Context, Module};
use ballot_state::{NativeStorage, Storage, WorkingSet};
use proptest::prelude::*;

const CANDIDATES: [&str; 3] = ["Alice", "Bob", "Carol"];
const END_BLOCK: u64 = 10;

#[derive(Debug, Clone)]
struct Ballot {
    voter: u8,
    candidate: usize,
    block_height: u64,
}

fn ballot() -> impl Strategy<Value = Ballot> {
    // Voter ids and candidate indexes deliberately overflow their pools to
    // produce repeat voters and unknown candidates.
    (0u8..6, 0usize..4, 0u64..15).prop_map(|(voter, candidate, block_height)| Ballot {
        voter,
        candidate,
        block_height,
    })
}

fn candidate_name(index: usize) -> String {
    CANDIDATES
        .get(index)
        .map(|name| name.to_string())
        .unwrap_or_else(|| "Mallory".to_owned())
}

fn init(storage: NativeStorage) -> (Election<DefaultContext>, WorkingSet<NativeStorage>) {
    let election = Election::<DefaultContext>::default();
    let mut working_set = WorkingSet::new(storage);
    let config = ElectionConfig {
        end_block: END_BLOCK,
        candidates: CANDIDATES.iter().map(|name| name.to_string()).collect(),
    };
    election.genesis(&config, &mut working_set).unwrap();
    (election, working_set)
}

proptest! {
    #[test]
    fn tallies_match_voters(ballots in prop::collection::vec(ballot(), 0..40)) {
        let (election, working_set) = init(NativeStorage::temporary());
        let mut checkpoint = working_set.checkpoint();
        let mut voted = HashSet::new();

        for ballot in &ballots {
            let voter = Address::Account([ballot.voter; 32]);
            let context = DefaultContext::new(voter, ballot.block_height);
            let msg = CallMessage::Vote { candidate: candidate_name(ballot.candidate) };

            let mut working_set = checkpoint.to_revertable();
            match election.call(msg, &context, &mut working_set) {
                Ok(_) => {
                    prop_assert!(ballot.block_height <= END_BLOCK);
                    prop_assert!(ballot.candidate < CANDIDATES.len());
                    // One vote per account.
                    prop_assert!(voted.insert(ballot.voter));
                    checkpoint = working_set.checkpoint();
                }
                Err(err) => {
                    let err = err.downcast_ref::<ElectionError>();
                    let expected = if ballot.block_height > END_BLOCK {
                        matches!(err, Some(ElectionError::VotingEnded { .. }))
                    } else if voted.contains(&ballot.voter) {
                        matches!(err, Some(ElectionError::VoterAlreadyVoted(_)))
                    } else {
                        matches!(err, Some(ElectionError::UnknownCandidate(_)))
                    };
                    prop_assert!(expected, "unexpected rejection: {:?}", err);
                    checkpoint = working_set.revert();
                }
            }
        }

        let mut working_set = checkpoint.to_revertable();
        let mut sum = 0u64;
        for name in CANDIDATES {
            sum += u64::from(election.get_candidate_votes(name, &mut working_set).unwrap());
        }
        prop_assert_eq!(sum, voted.len() as u64);
        prop_assert_eq!(election.number_of_votes(&mut working_set).unwrap(), sum);
        for voter in 0u8..6 {
            let address = Address::Account([voter; 32]);
            prop_assert_eq!(
                election.has_voted(&address, &mut working_set).unwrap(),
                voted.contains(&voter)
            );
        }
    }
}

#[test]
fn election_survives_restart() {
    let tmpdir = tempfile::tempdir().unwrap();

    {
        let storage = NativeStorage::with_path(tmpdir.path()).unwrap();
        let (election, mut working_set) = init(storage.clone());
        let context = DefaultContext::new(Address::Account([1; 32]), 3);
        let msg = CallMessage::Vote {
            candidate: "Carol".to_owned(),
        };
        election.call(msg, &context, &mut working_set).unwrap();
        storage
            .validate_and_commit(working_set.checkpoint().freeze())
            .unwrap();
    }

    let storage = NativeStorage::with_path(tmpdir.path()).unwrap();
    let election = Election::<DefaultContext>::default();
    let mut working_set = WorkingSet::new(storage);

    assert_eq!(
        election
            .get_candidate_votes("Carol", &mut working_set)
            .unwrap(),
        1
    );
    assert!(election
        .has_voted(&Address::Account([1; 32]), &mut working_set)
        .unwrap());
    assert_eq!(election.end_block(&mut working_set).unwrap(), Some(END_BLOCK));
}
