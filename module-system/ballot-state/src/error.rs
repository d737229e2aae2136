use ballot_rw_cache::ReadError;
use thiserror::Error;

use crate::storage::StorageKey;
use crate::Prefix;

/// Errors raised while reading state through a [`crate::WorkingSet`].
#[derive(Debug, Error)]
pub enum StateError {
    /// A container expected a value that is not in storage.
    #[error("Value not found for prefix: {0}")]
    MissingValue(Prefix),
    /// A map expected a key that is not in storage.
    #[error("Value not found for prefix: {0} and storage key {1}")]
    MissingKey(Prefix, StorageKey),
    /// The bytes stored under a key do not decode into the expected type.
    #[error("Unable to decode the value stored under {key}: {reason}")]
    Decode {
        /// The offending key.
        key: StorageKey,
        /// The codec error message.
        reason: String,
    },
    /// A read disagreed with an earlier access to the same key.
    #[error(transparent)]
    InconsistentRead(#[from] ReadError),
}
