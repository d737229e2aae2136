use std::fmt::Display;
use std::sync::Arc;

use ballot_rw_cache::{CacheEntry, CacheKey, CacheValue};

use crate::codec::{EncodeKeyLike, StateValueCodec};
use crate::Prefix;

/// `Key` type for the [`Storage`].
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct StorageKey {
    key: Arc<Vec<u8>>,
}

impl From<CacheKey> for StorageKey {
    fn from(cache_key: CacheKey) -> Self {
        Self { key: cache_key.key }
    }
}

impl StorageKey {
    /// Creates a new [`StorageKey`] that combines a prefix and a key.
    pub fn new<K, Q, KC>(prefix: &Prefix, key: &Q, codec: &KC) -> Self
    where
        KC: EncodeKeyLike<Q, K>,
        Q: ?Sized,
    {
        let encoded_key = codec.encode_key_like(key);

        let mut full_key = Vec::<u8>::with_capacity(prefix.len() + encoded_key.len());
        full_key.extend_from_slice(prefix.as_bytes());
        full_key.extend_from_slice(&encoded_key);

        Self {
            key: Arc::new(full_key),
        }
    }

    /// Creates the key of a container holding a single value.
    pub fn singleton(prefix: &Prefix) -> Self {
        Self {
            key: Arc::new(prefix.as_bytes().to_vec()),
        }
    }

    /// Returns the raw key bytes as a slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Converts this key into a [`CacheKey`] without consuming it.
    pub fn to_cache_key(&self) -> CacheKey {
        CacheKey {
            key: self.key.clone(),
        }
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.as_bytes()))
    }
}

/// A serialized value suitable for storing. Internally uses an [`Arc<Vec<u8>>`] for cheap cloning.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StorageValue {
    value: Arc<Vec<u8>>,
}

impl From<CacheValue> for StorageValue {
    fn from(cache_value: CacheValue) -> Self {
        Self {
            value: cache_value.value,
        }
    }
}

impl From<Vec<u8>> for StorageValue {
    fn from(value: Vec<u8>) -> Self {
        Self {
            value: Arc::new(value),
        }
    }
}

impl StorageValue {
    /// Creates a new storage value by serializing the input with the given codec.
    pub fn new<V, VC>(value: &V, codec: &VC) -> Self
    where
        VC: StateValueCodec<V>,
    {
        Self {
            value: Arc::new(codec.encode_value(value)),
        }
    }

    /// Returns the bytes of this value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Converts this value into a [`CacheValue`].
    pub fn into_cache_value(self) -> CacheValue {
        CacheValue { value: self.value }
    }
}

/// The values read from storage and the values to be written, both sorted by key.
///
/// Produced by [`crate::StateCheckpoint::freeze`] and consumed by [`Storage::validate_and_commit`].
#[derive(Debug, Default)]
pub struct OrderedReadsAndWrites {
    /// The first value observed for every key read from the backing storage.
    pub ordered_reads: Vec<CacheEntry>,
    /// The last value written for every modified key. `None` deletes the key.
    pub ordered_writes: Vec<CacheEntry>,
}

/// An interface for storing and retrieving values in the storage.
///
/// Implementations are cheap to clone; clones share the same committed state.
pub trait Storage: Clone {
    /// The runtime config for this storage instance.
    type RuntimeConfig;

    /// Opens the storage described by `config`.
    fn with_config(config: Self::RuntimeConfig) -> Result<Self, anyhow::Error>;

    /// Returns the value corresponding to the key or None if key is absent.
    fn get(&self, key: &StorageKey) -> Option<StorageValue>;

    /// Returns the root hash of the committed state.
    fn get_state_root(&self) -> anyhow::Result<[u8; 32]>;

    /// Checks that every recorded read still matches the committed state, then
    /// applies all writes at once and returns the new state root. Nothing is
    /// applied when the validation fails.
    fn validate_and_commit(
        &self,
        state_accesses: OrderedReadsAndWrites,
    ) -> Result<[u8; 32], anyhow::Error>;

    /// Indicates if storage is empty or not.
    fn is_empty(&self) -> bool;
}

// Used only in tests.
#[cfg(test)]
impl From<&'static str> for StorageKey {
    fn from(key: &'static str) -> Self {
        Self {
            key: Arc::new(key.as_bytes().to_vec()),
        }
    }
}

// Used only in tests.
#[cfg(test)]
impl From<&'static str> for StorageValue {
    fn from(value: &'static str) -> Self {
        Self {
            value: Arc::new(value.as_bytes().to_vec()),
        }
    }
}
