//! Storage and state management interfaces for ballot modules.

#![deny(missing_docs)]

pub mod codec;
pub mod config;
mod containers;
mod error;
mod events;
mod native_storage;
mod scratchpad;

/// Trait and type definitions related to the [`Storage`] trait.
pub mod storage;

#[cfg(test)]
mod state_tests;

use std::fmt::Display;
use std::str;

pub use ballot_rw_cache::CacheLog;
pub use containers::{StateMap, StateValue};
pub use error::StateError;
pub use events::Event;
pub use native_storage::NativeStorage;
pub use scratchpad::{StateCheckpoint, WorkingSet};
pub use storage::{OrderedReadsAndWrites, Storage, StorageKey, StorageValue};

/// A prefix prepended to each key before insertion and retrieval from the storage.
///
/// All state containers of a module share one working set, so two containers
/// would collide on equal keys unless every container owns a distinct prefix.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Prefix {
    prefix: Vec<u8>,
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match str::from_utf8(&self.prefix) {
            Ok(s) => write!(f, "{:?}", s),
            Err(_) => write!(f, "0x{}", hex::encode(&self.prefix)),
        }
    }
}

impl Prefix {
    /// Creates a new prefix from a byte vector.
    pub fn new(prefix: Vec<u8>) -> Self {
        Self { prefix }
    }

    /// Returns the raw prefix bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.prefix
    }

    /// Returns the length in bytes of the prefix.
    pub fn len(&self) -> usize {
        self.prefix.len()
    }

    /// Returns `true` if the prefix is empty, `false` otherwise.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }
}

impl From<&str> for Prefix {
    fn from(prefix: &str) -> Self {
        Self::new(prefix.as_bytes().to_vec())
    }
}
