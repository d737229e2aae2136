use crate::storage::StorageKey;
use crate::{
    NativeStorage, Prefix, StateCheckpoint, StateError, StateMap, StateValue, Storage, WorkingSet,
};

fn tallies() -> StateMap<String, u32> {
    StateMap::new(Prefix::from("tests/tallies/"))
}

fn total() -> StateValue<u64> {
    StateValue::new(Prefix::from("tests/total/"))
}

fn commit(checkpoint: StateCheckpoint<NativeStorage>, storage: &NativeStorage) {
    storage
        .validate_and_commit(checkpoint.freeze())
        .expect("commit must succeed");
}

#[test]
fn test_value_set_get_remove() {
    let mut working_set = WorkingSet::new(NativeStorage::temporary());
    let total = total();

    assert_eq!(total.get(&mut working_set).unwrap(), None);
    assert!(matches!(
        total.get_or_err(&mut working_set),
        Err(StateError::MissingValue(_))
    ));

    total.set(&7, &mut working_set);
    assert_eq!(total.get_or_err(&mut working_set).unwrap(), 7);
    assert_eq!(total.remove(&mut working_set).unwrap(), Some(7));
    assert_eq!(total.get(&mut working_set).unwrap(), None);
}

#[test]
fn test_map_accepts_borrowed_keys() {
    let mut working_set = WorkingSet::new(NativeStorage::temporary());
    let tallies = tallies();

    tallies.set(&"alice".to_string(), &1, &mut working_set);
    assert_eq!(tallies.get("alice", &mut working_set).unwrap(), Some(1));
    assert_eq!(tallies.get("bob", &mut working_set).unwrap(), None);
    assert!(matches!(
        tallies.get_or_err("bob", &mut working_set),
        Err(StateError::MissingKey(_, _))
    ));

    tallies.delete("alice", &mut working_set);
    assert_eq!(tallies.get("alice", &mut working_set).unwrap(), None);
}

#[test]
fn test_prefixes_keep_containers_apart() {
    let mut working_set = WorkingSet::new(NativeStorage::temporary());
    let first: StateMap<String, u32> = StateMap::new(Prefix::from("first/"));
    let second: StateMap<String, u32> = StateMap::new(Prefix::from("second/"));

    first.set("key", &1, &mut working_set);
    second.set("key", &2, &mut working_set);

    assert_eq!(first.get("key", &mut working_set).unwrap(), Some(1));
    assert_eq!(second.get("key", &mut working_set).unwrap(), Some(2));
}

#[test]
fn test_checkpoint_keeps_writes() {
    let storage = NativeStorage::temporary();
    let tallies = tallies();

    let mut working_set = WorkingSet::new(storage.clone());
    tallies.set("alice", &3, &mut working_set);
    commit(working_set.checkpoint(), &storage);

    let mut working_set = WorkingSet::new(storage.clone());
    assert_eq!(tallies.get("alice", &mut working_set).unwrap(), Some(3));
}

#[test]
fn test_revert_discards_writes_and_events() {
    let storage = NativeStorage::temporary();
    let tallies = tallies();

    let mut working_set = WorkingSet::new(storage.clone());
    tallies.set("alice", &1, &mut working_set);
    let mut working_set = working_set.checkpoint().to_revertable();

    tallies.set("alice", &2, &mut working_set);
    tallies.set("bob", &5, &mut working_set);
    working_set.add_event("tests", "reverted");
    assert_eq!(working_set.events().len(), 1);

    let mut working_set = working_set.revert().to_revertable();
    assert!(working_set.events().is_empty());
    assert_eq!(tallies.get("alice", &mut working_set).unwrap(), Some(1));
    assert_eq!(tallies.get("bob", &mut working_set).unwrap(), None);

    commit(working_set.checkpoint(), &storage);
    let mut working_set = WorkingSet::new(storage);
    assert_eq!(tallies.get("alice", &mut working_set).unwrap(), Some(1));
    assert_eq!(tallies.get("bob", &mut working_set).unwrap(), None);
}

#[test]
fn test_take_events_drains() {
    let mut working_set = WorkingSet::new(NativeStorage::temporary());
    working_set.add_event("a", "1");
    working_set.add_event("b", "2");

    let events = working_set.take_events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].key, "a");
    assert!(working_set.take_events().is_empty());
}

#[test]
fn test_undecodable_value_is_an_error() {
    let mut working_set = WorkingSet::new(NativeStorage::temporary());
    let total = total();

    // A `u64` needs eight bytes.
    working_set.set_raw(StorageKey::singleton(total.prefix()), vec![1, 2, 3]);

    match total.get(&mut working_set) {
        Err(StateError::Decode { key, .. }) => {
            assert_eq!(key, StorageKey::singleton(total.prefix()))
        }
        other => panic!("expected a decode error, got {:?}", other),
    }
}

#[test]
fn test_concurrent_commit_is_rejected() {
    let storage = NativeStorage::temporary();
    let total = total();

    let mut first = WorkingSet::new(storage.clone());
    let mut second = WorkingSet::new(storage.clone());
    assert_eq!(total.get(&mut first).unwrap(), None);
    assert_eq!(total.get(&mut second).unwrap(), None);

    total.set(&1, &mut first);
    total.set(&2, &mut second);

    commit(first.checkpoint(), &storage);
    assert!(storage
        .validate_and_commit(second.checkpoint().freeze())
        .is_err());

    let mut working_set = WorkingSet::new(storage);
    assert_eq!(total.get(&mut working_set).unwrap(), Some(1));
}

// Containers are declared before any codec bound on their value type is known,
// e.g. as fields of a struct generic over the value.
struct Registry<V> {
    latest: StateValue<V>,
    by_name: StateMap<String, V>,
}

impl<V> Registry<V> {
    fn new() -> Self {
        Self {
            latest: StateValue::new(Prefix::from("tests/registry/latest/")),
            by_name: StateMap::new(Prefix::from("tests/registry/by_name/")),
        }
    }
}

#[test]
fn test_default_codec_containers_in_generic_code() {
    let registry = Registry::<u32>::new();
    let mut working_set = WorkingSet::new(NativeStorage::temporary());

    registry.latest.set(&4, &mut working_set);
    registry.by_name.set("four", &4, &mut working_set);

    assert_eq!(registry.latest.get(&mut working_set).unwrap(), Some(4));
    assert_eq!(registry.by_name.get("four", &mut working_set).unwrap(), Some(4));
    assert_eq!(registry.latest.prefix(), &Prefix::from("tests/registry/latest/"));
}
