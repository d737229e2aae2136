use std::marker::PhantomData;

use crate::codec::{BorshCodec, StateValueCodec};
use crate::{Prefix, StateError, Storage, WorkingSet};

/// Container for a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct StateValue<V, Codec = BorshCodec> {
    _phantom: PhantomData<V>,
    codec: Codec,
    prefix: Prefix,
}

impl<V> StateValue<V> {
    /// Creates a new [`StateValue`] with the given prefix and the default
    /// [`StateValueCodec`] (i.e. [`BorshCodec`]).
    pub fn new(prefix: Prefix) -> Self {
        Self {
            _phantom: PhantomData,
            codec: BorshCodec,
            prefix,
        }
    }
}

impl<V, Codec> StateValue<V, Codec>
where
    Codec: StateValueCodec<V>,
{
    /// Creates a new [`StateValue`] with the given prefix and codec.
    pub fn with_codec(prefix: Prefix, codec: Codec) -> Self {
        Self {
            _phantom: PhantomData,
            codec,
            prefix,
        }
    }

    /// Returns the prefix used when this [`StateValue`] was created.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// Sets a value in the StateValue.
    pub fn set<S: Storage>(&self, value: &V, working_set: &mut WorkingSet<S>) {
        working_set.set_singleton(&self.prefix, &self.codec, value)
    }

    /// Gets a value from the StateValue or None if the value is absent.
    pub fn get<S: Storage>(
        &self,
        working_set: &mut WorkingSet<S>,
    ) -> Result<Option<V>, StateError> {
        working_set.get_singleton(&self.prefix, &self.codec)
    }

    /// Gets a value from the StateValue or Error if the value is absent.
    pub fn get_or_err<S: Storage>(
        &self,
        working_set: &mut WorkingSet<S>,
    ) -> Result<V, StateError> {
        self.get(working_set)?
            .ok_or_else(|| StateError::MissingValue(self.prefix.clone()))
    }

    /// Removes a value from the StateValue, returning the value (or None if the key is absent).
    pub fn remove<S: Storage>(
        &self,
        working_set: &mut WorkingSet<S>,
    ) -> Result<Option<V>, StateError> {
        let value = self.get(working_set)?;
        self.delete(working_set);
        Ok(value)
    }

    /// Deletes a value from the StateValue.
    pub fn delete<S: Storage>(&self, working_set: &mut WorkingSet<S>) {
        working_set.delete_singleton(&self.prefix);
    }
}
