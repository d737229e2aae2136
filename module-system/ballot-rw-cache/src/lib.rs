//! A log that remembers, for every storage key, the first value read and the
//! last value written during a unit of execution.
//!
//! The log lets a working set answer reads from its own writes and later hand
//! the storage layer two ordered sets: the reads that must still hold when the
//! writes are applied, and the writes themselves.

mod access;
pub mod cache;

use std::fmt::Display;
use std::sync::Arc;

pub use access::Access;
pub use cache::{CacheEntry, CacheLog, ReadError, ValueExists};

/// A raw storage key, shared cheaply between the log and the storage layer.
#[derive(Debug, Eq, PartialEq, Clone, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub key: Arc<Vec<u8>>,
}

impl CacheKey {
    pub fn new(key: Vec<u8>) -> Self {
        Self { key: Arc::new(key) }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x")?;
        for byte in self.key.iter() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A raw storage value. Absence of a value is modelled as `Option<CacheValue>`.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct CacheValue {
    pub value: Arc<Vec<u8>>,
}

impl CacheValue {
    pub fn new(value: Vec<u8>) -> Self {
        Self {
            value: Arc::new(value),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use crate::{CacheKey, CacheValue};

    pub(crate) fn key(k: u8) -> CacheKey {
        CacheKey::new(vec![k])
    }

    pub(crate) fn value(v: u8) -> Option<CacheValue> {
        Some(CacheValue::new(vec![v]))
    }
}
