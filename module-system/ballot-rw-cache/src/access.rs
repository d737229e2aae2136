use crate::CacheValue;

/// The history of a single key inside a [`crate::CacheLog`].
///
/// Only the first read and the last write are kept:
/// 1. A read following a read or a write must observe the same value and is dropped.
/// 2. A write following a read keeps the original read next to the new value.
/// 3. A write following a write replaces it.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Access {
    Read(Option<CacheValue>),
    ReadThenWrite {
        original: Option<CacheValue>,
        modified: Option<CacheValue>,
    },
    Write(Option<CacheValue>),
}

impl Access {
    /// The value a subsequent read of this key must observe.
    pub fn last_value(&self) -> &Option<CacheValue> {
        match self {
            Access::Read(value) | Access::Write(value) => value,
            Access::ReadThenWrite { modified, .. } => modified,
        }
    }

    /// The value read from the backing store before any write, if the key was read first.
    pub fn first_read(&self) -> Option<&Option<CacheValue>> {
        match self {
            Access::Read(value) => Some(value),
            Access::ReadThenWrite { original, .. } => Some(original),
            Access::Write(_) => None,
        }
    }

    /// The pending write for this key, if any.
    pub fn written(&self) -> Option<&Option<CacheValue>> {
        match self {
            Access::Read(_) => None,
            Access::ReadThenWrite { modified, .. } => Some(modified),
            Access::Write(value) => Some(value),
        }
    }

    pub(crate) fn write_value(&mut self, new_value: Option<CacheValue>) {
        match self {
            Access::Read(original) => {
                *self = Access::ReadThenWrite {
                    original: original.take(),
                    modified: new_value,
                };
            }
            Access::ReadThenWrite { modified, .. } => *modified = new_value,
            Access::Write(value) => *value = new_value,
        }
    }
}
