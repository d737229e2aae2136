use std::borrow::Borrow;
use std::marker::PhantomData;

use crate::codec::{BorshCodec, EncodeKeyLike, StateValueCodec};
use crate::storage::StorageKey;
use crate::{Prefix, StateError, Storage, WorkingSet};

/// A container that maps keys to values.
///
/// # Type parameters
/// [`StateMap`] is generic over:
/// - a key type `K`;
/// - a value type `V`;
/// - a codec which encodes `K` as a key and `V` as a value.
///
/// Maps are not iterable: only the keys a caller already knows can be read.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMap<K, V, Codec = BorshCodec> {
    _phantom: (PhantomData<K>, PhantomData<V>),
    codec: Codec,
    prefix: Prefix,
}

impl<K, V> StateMap<K, V> {
    /// Creates a new [`StateMap`] with the given prefix and the default
    /// [`BorshCodec`].
    pub fn new(prefix: Prefix) -> Self {
        Self {
            _phantom: (PhantomData, PhantomData),
            codec: BorshCodec,
            prefix,
        }
    }
}

impl<K, V, Codec> StateMap<K, V, Codec>
where
    Codec: StateValueCodec<V>,
{
    /// Creates a new [`StateMap`] with the given prefix and codec.
    pub fn with_codec(prefix: Prefix, codec: Codec) -> Self {
        Self {
            _phantom: (PhantomData, PhantomData),
            codec,
            prefix,
        }
    }

    /// Returns the prefix used when this [`StateMap`] was created.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// Inserts a key-value pair into the map.
    ///
    /// Much like [`StateMap::get`], the key may be any borrowed form of the
    /// map's key type.
    pub fn set<Q, S>(&self, key: &Q, value: &V, working_set: &mut WorkingSet<S>)
    where
        Codec: EncodeKeyLike<Q, K>,
        K: Borrow<Q>,
        Q: ?Sized,
        S: Storage,
    {
        working_set.set_value::<Q, K, V, Codec>(&self.prefix, &self.codec, key, value)
    }

    /// Returns the value corresponding to the key, or [`None`] if the map
    /// doesn't contain the key.
    ///
    /// # Examples
    ///
    /// The key may be any borrowed form of the map's key type. Note that
    /// [`Hash`] and [`Eq`] on the borrowed form *must* match those for the key
    /// type.
    ///
    /// ```
    /// use ballot_state::{NativeStorage, Prefix, StateMap, WorkingSet};
    ///
    /// let map: StateMap<String, u32> = StateMap::new(Prefix::from("tallies/"));
    /// let mut working_set = WorkingSet::new(NativeStorage::temporary());
    ///
    /// map.set("alice", &2, &mut working_set);
    /// assert_eq!(map.get("alice", &mut working_set).unwrap(), Some(2));
    /// ```
    pub fn get<Q, S>(
        &self,
        key: &Q,
        working_set: &mut WorkingSet<S>,
    ) -> Result<Option<V>, StateError>
    where
        Codec: EncodeKeyLike<Q, K>,
        K: Borrow<Q>,
        Q: ?Sized,
        S: Storage,
    {
        working_set.get_value::<Q, K, V, Codec>(&self.prefix, &self.codec, key)
    }

    /// Returns the value corresponding to the key or [`StateError::MissingKey`]
    /// if the key is absent.
    pub fn get_or_err<Q, S>(
        &self,
        key: &Q,
        working_set: &mut WorkingSet<S>,
    ) -> Result<V, StateError>
    where
        Codec: EncodeKeyLike<Q, K>,
        K: Borrow<Q>,
        Q: ?Sized,
        S: Storage,
    {
        self.get(key, working_set)?.ok_or_else(|| {
            StateError::MissingKey(
                self.prefix.clone(),
                StorageKey::new::<K, Q, Codec>(&self.prefix, key, &self.codec),
            )
        })
    }

    /// Removes a key from the map, returning the corresponding value (or
    /// [`None`] if the key is absent).
    pub fn remove<Q, S>(
        &self,
        key: &Q,
        working_set: &mut WorkingSet<S>,
    ) -> Result<Option<V>, StateError>
    where
        Codec: EncodeKeyLike<Q, K>,
        K: Borrow<Q>,
        Q: ?Sized,
        S: Storage,
    {
        let value = self.get(key, working_set)?;
        self.delete(key, working_set);
        Ok(value)
    }

    /// Deletes a key-value pair from the map.
    ///
    /// This is equivalent to [`StateMap::remove`], but doesn't return the value.
    pub fn delete<Q, S>(&self, key: &Q, working_set: &mut WorkingSet<S>)
    where
        Codec: EncodeKeyLike<Q, K>,
        K: Borrow<Q>,
        Q: ?Sized,
        S: Storage,
    {
        working_set.delete_value::<Q, K, Codec>(&self.prefix, &self.codec, key);
    }
}
