use std::collections::HashMap;
use std::fmt::Debug;

use ballot_rw_cache::{CacheKey, CacheLog, CacheValue, ValueExists};

use crate::codec::{EncodeKeyLike, StateValueCodec};
use crate::error::StateError;
use crate::events::Event;
use crate::storage::{OrderedReadsAndWrites, StorageKey, StorageValue};
use crate::{Prefix, Storage};

/// Accumulates reads and writes on top of the underlying storage.
struct Delta<S: Storage> {
    inner: S,
    cache: CacheLog,
}

/// Additional writes layered on top of a [`Delta`], so that a single call can be
/// discarded without losing the changes made before it.
///
/// Reads that miss the write layer are recorded in the underlying delta, because
/// even a reverted call executed against some state and that state must still
/// hold when the batch is committed.
struct RevertableDelta<S: Storage> {
    inner: Delta<S>,
    writes: HashMap<CacheKey, Option<CacheValue>>,
}

/// The committed read-write set, obtained from a [`WorkingSet`] through
/// [`WorkingSet::checkpoint`] or [`WorkingSet::revert`].
pub struct StateCheckpoint<S: Storage> {
    delta: Delta<S>,
}

impl<S: Storage> StateCheckpoint<S> {
    /// Starts an empty read-write set on top of `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            delta: Delta::new(inner),
        }
    }

    /// Opens a revertable working set on top of this checkpoint.
    pub fn to_revertable(self) -> WorkingSet<S> {
        WorkingSet {
            delta: RevertableDelta {
                inner: self.delta,
                writes: Default::default(),
            },
            events: Default::default(),
        }
    }

    /// Consumes the checkpoint, returning the reads to validate and the writes to apply.
    pub fn freeze(self) -> OrderedReadsAndWrites {
        let (ordered_reads, ordered_writes) = self.delta.cache.into_reads_and_writes();
        OrderedReadsAndWrites {
            ordered_reads,
            ordered_writes,
        }
    }
}

impl<S: Storage> Debug for StateCheckpoint<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCheckpoint")
            .field("accessed_keys", &self.delta.cache.len())
            .finish()
    }
}

/// The read-write set and the events of a single call in flight.
///
/// A working set ends in one of two ways:
/// 1. [`WorkingSet::checkpoint`] keeps every change in the returned [`StateCheckpoint`].
/// 2. [`WorkingSet::revert`] drops the writes and events of the call and returns the
///    checkpoint as it was before the call.
pub struct WorkingSet<S: Storage> {
    delta: RevertableDelta<S>,
    events: Vec<Event>,
}

impl<S: Storage> WorkingSet<S> {
    /// Opens a working set directly on top of `inner`.
    pub fn new(inner: S) -> Self {
        StateCheckpoint::new(inner).to_revertable()
    }

    /// Keeps the writes of this working set.
    pub fn checkpoint(self) -> StateCheckpoint<S> {
        StateCheckpoint {
            delta: self.delta.commit(),
        }
    }

    /// Discards the writes of this working set.
    pub fn revert(self) -> StateCheckpoint<S> {
        StateCheckpoint {
            delta: self.delta.revert(),
        }
    }

    /// Records an event.
    pub fn add_event(&mut self, key: &str, value: &str) {
        self.events.push(Event::new(key, value));
    }

    /// Takes all events recorded so far.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Returns the events recorded so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub(crate) fn get(&mut self, key: &StorageKey) -> Result<Option<StorageValue>, StateError> {
        self.delta.get(key)
    }

    pub(crate) fn set(&mut self, key: &StorageKey, value: StorageValue) {
        self.delta.set(key, value)
    }

    pub(crate) fn delete(&mut self, key: &StorageKey) {
        self.delta.delete(key)
    }
}

impl<S: Storage> WorkingSet<S> {
    pub(crate) fn set_value<Q, K, V, C>(&mut self, prefix: &Prefix, codec: &C, key: &Q, value: &V)
    where
        Q: ?Sized,
        C: EncodeKeyLike<Q, K> + StateValueCodec<V>,
    {
        let storage_key = StorageKey::new::<K, Q, C>(prefix, key, codec);
        let storage_value = StorageValue::new(value, codec);
        self.set(&storage_key, storage_value);
    }

    pub(crate) fn get_value<Q, K, V, C>(
        &mut self,
        prefix: &Prefix,
        codec: &C,
        key: &Q,
    ) -> Result<Option<V>, StateError>
    where
        Q: ?Sized,
        C: EncodeKeyLike<Q, K> + StateValueCodec<V>,
    {
        let storage_key = StorageKey::new::<K, Q, C>(prefix, key, codec);
        self.get_decoded(storage_key, codec)
    }

    pub(crate) fn delete_value<Q, K, C>(&mut self, prefix: &Prefix, codec: &C, key: &Q)
    where
        Q: ?Sized,
        C: EncodeKeyLike<Q, K>,
    {
        let storage_key = StorageKey::new::<K, Q, C>(prefix, key, codec);
        self.delete(&storage_key);
    }

    pub(crate) fn set_singleton<V, C>(&mut self, prefix: &Prefix, codec: &C, value: &V)
    where
        C: StateValueCodec<V>,
    {
        let storage_value = StorageValue::new(value, codec);
        self.set(&StorageKey::singleton(prefix), storage_value);
    }

    pub(crate) fn get_singleton<V, C>(
        &mut self,
        prefix: &Prefix,
        codec: &C,
    ) -> Result<Option<V>, StateError>
    where
        C: StateValueCodec<V>,
    {
        self.get_decoded(StorageKey::singleton(prefix), codec)
    }

    pub(crate) fn delete_singleton(&mut self, prefix: &Prefix) {
        self.delete(&StorageKey::singleton(prefix));
    }

    fn get_decoded<V, C>(&mut self, key: StorageKey, codec: &C) -> Result<Option<V>, StateError>
    where
        C: StateValueCodec<V>,
    {
        let Some(storage_value) = self.get(&key)? else {
            return Ok(None);
        };

        codec
            .try_decode_value(storage_value.value())
            .map(Some)
            .map_err(|e| StateError::Decode {
                key,
                reason: e.to_string(),
            })
    }

    /// Writes raw bytes under a raw key, bypassing the codecs.
    #[cfg(test)]
    pub(crate) fn set_raw(&mut self, key: StorageKey, value: Vec<u8>) {
        self.set(&key, StorageValue::from(value));
    }
}

impl<S: Storage> Debug for WorkingSet<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingSet")
            .field("pending_writes", &self.delta.writes.len())
            .field("events", &self.events)
            .finish()
    }
}

impl<S: Storage> RevertableDelta<S> {
    fn get(&mut self, key: &StorageKey) -> Result<Option<StorageValue>, StateError> {
        if let Some(value) = self.writes.get(&key.to_cache_key()) {
            return Ok(value.clone().map(StorageValue::from));
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: &StorageKey, value: StorageValue) {
        self.writes
            .insert(key.to_cache_key(), Some(value.into_cache_value()));
    }

    fn delete(&mut self, key: &StorageKey) {
        self.writes.insert(key.to_cache_key(), None);
    }

    fn commit(self) -> Delta<S> {
        let mut inner = self.inner;
        for (key, value) in self.writes {
            inner.cache.add_write(key, value);
        }
        inner
    }

    fn revert(self) -> Delta<S> {
        self.inner
    }
}

impl<S: Storage> Delta<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Default::default(),
        }
    }

    fn get(&mut self, key: &StorageKey) -> Result<Option<StorageValue>, StateError> {
        let cache_key = key.to_cache_key();
        match self.cache.get_value(&cache_key) {
            ValueExists::Yes(value) => Ok(value.map(StorageValue::from)),
            ValueExists::No => {
                let storage_value = self.inner.get(key);
                let cache_value = storage_value.clone().map(StorageValue::into_cache_value);
                self.cache.add_read(cache_key, cache_value)?;
                Ok(storage_value)
            }
        }
    }
}
