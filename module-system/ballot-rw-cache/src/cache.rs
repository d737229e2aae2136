use std::collections::hash_map::Entry;
use std::collections::HashMap;

use thiserror::Error;

use crate::access::Access;
use crate::{CacheKey, CacheValue};

#[derive(Error, Debug, Eq, PartialEq)]
pub enum ReadError {
    #[error("inconsistent read, expected: {expected:?}, found: {found:?}")]
    InconsistentRead {
        expected: Option<CacheValue>,
        found: Option<CacheValue>,
    },
}

/// A cache entry can be in three states:
/// - the key was never touched: `ValueExists::No`
/// - the key was touched and holds no value: `ValueExists::Yes(None)`
/// - the key was touched and holds a value: `ValueExists::Yes(Some(value))`
#[derive(Debug, PartialEq, Eq)]
pub enum ValueExists {
    Yes(Option<CacheValue>),
    No,
}

/// A key/value pair as stored in the ordered read and write sets.
pub type CacheEntry = (CacheKey, Option<CacheValue>);

/// `CacheLog` keeps track of the first read and the last write for every key.
#[derive(Default, Debug, Clone)]
pub struct CacheLog {
    log: HashMap<CacheKey, Access>,
}

impl CacheLog {
    pub fn len(&self) -> usize {
        self.log.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Returns the latest value known for `key`.
    pub fn get_value(&self, key: &CacheKey) -> ValueExists {
        match self.log.get(key) {
            Some(access) => ValueExists::Yes(access.last_value().clone()),
            None => ValueExists::No,
        }
    }

    /// Records a read. The first read of a key is remembered; later reads must agree
    /// with whatever the log already holds for that key.
    pub fn add_read(&mut self, key: CacheKey, value: Option<CacheValue>) -> Result<(), ReadError> {
        match self.log.entry(key) {
            Entry::Occupied(existing) => {
                let expected = existing.get().last_value();
                if expected != &value {
                    return Err(ReadError::InconsistentRead {
                        expected: expected.clone(),
                        found: value,
                    });
                }
                Ok(())
            }
            Entry::Vacant(vacancy) => {
                vacancy.insert(Access::Read(value));
                Ok(())
            }
        }
    }

    /// Records a write. `None` records a deletion.
    pub fn add_write(&mut self, key: CacheKey, value: Option<CacheValue>) {
        match self.log.entry(key) {
            Entry::Occupied(mut existing) => existing.get_mut().write_value(value),
            Entry::Vacant(vacancy) => {
                vacancy.insert(Access::Write(value));
            }
        }
    }

    /// Consumes the log, returning the first reads and the last writes, both sorted by key.
    pub fn into_reads_and_writes(self) -> (Vec<CacheEntry>, Vec<CacheEntry>) {
        let mut reads = Vec::new();
        let mut writes = Vec::new();

        for (key, access) in self.log {
            if let Some(original) = access.first_read() {
                reads.push((key.clone(), original.clone()));
            }
            if let Some(modified) = access.written() {
                writes.push((key, modified.clone()));
            }
        }

        reads.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));
        writes.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));
        (reads, writes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;
    use crate::test_util::{key, value};

    impl ValueExists {
        fn unwrap_yes(self) -> Option<CacheValue> {
            match self {
                ValueExists::Yes(value) => value,
                ValueExists::No => panic!("key is not in the cache"),
            }
        }
    }

    #[test]
    fn test_cache_read_write() {
        let mut cache_log = CacheLog::default();
        let k = key(1);

        cache_log.add_read(k.clone(), value(2)).unwrap();
        assert_eq!(cache_log.get_value(&k).unwrap_yes(), value(2));

        cache_log.add_write(k.clone(), value(3));
        assert_eq!(cache_log.get_value(&k).unwrap_yes(), value(3));

        // A read after a write has to observe the written value.
        cache_log.add_read(k.clone(), value(3)).unwrap();
        assert_eq!(
            cache_log.add_read(k.clone(), value(2)),
            Err(ReadError::InconsistentRead {
                expected: value(3),
                found: value(2),
            })
        );

        assert_eq!(cache_log.get_value(&key(9)), ValueExists::No);
    }

    #[test]
    fn test_inconsistent_first_reads() {
        let mut cache = CacheLog::default();

        assert!(cache.add_read(key(1), value(1)).is_ok());
        assert!(cache.add_read(key(2), value(1)).is_ok());
        assert_eq!(
            cache.add_read(key(1), value(2)),
            Err(ReadError::InconsistentRead {
                expected: value(1),
                found: value(2)
            })
        );
    }

    #[test]
    fn test_into_reads_and_writes() {
        let mut cache = CacheLog::default();
        cache.add_write(key(4), value(40));
        cache.add_read(key(2), value(20)).unwrap();
        cache.add_write(key(2), value(21));
        cache.add_read(key(1), None).unwrap();

        let (reads, writes) = cache.into_reads_and_writes();
        assert_eq!(reads, vec![(key(1), None), (key(2), value(20))]);
        assert_eq!(writes, vec![(key(2), value(21)), (key(4), value(40))]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Read(u8),
        Write(u8, Option<u8>),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..4).prop_map(Op::Read),
            (0u8..4, proptest::option::of(any::<u8>())).prop_map(|(k, v)| Op::Write(k, v)),
        ]
    }

    proptest! {
        #[test]
        fn test_log_tracks_first_read_and_last_write(ops in proptest::collection::vec(op_strategy(), 0..64)) {
            // Everything missing from the backing store reads as `None`.
            let mut cache = CacheLog::default();
            let mut current: BTreeMap<u8, Option<u8>> = BTreeMap::new();
            let mut first_reads: BTreeMap<u8, Option<u8>> = BTreeMap::new();
            let mut written: BTreeMap<u8, Option<u8>> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Read(k) => {
                        let observed = current.get(&k).cloned().flatten();
                        if !current.contains_key(&k) {
                            first_reads.insert(k, observed);
                            current.insert(k, observed);
                        }
                        let read = observed.map(|v| CacheValue::new(vec![v]));
                        prop_assert!(cache.add_read(key(k), read).is_ok());
                    }
                    Op::Write(k, v) => {
                        cache.add_write(key(k), v.map(|v| CacheValue::new(vec![v])));
                        current.insert(k, v);
                        written.insert(k, v);
                    }
                }
            }

            let (reads, writes) = cache.into_reads_and_writes();
            let expected_reads: Vec<_> = first_reads
                .into_iter()
                .map(|(k, v)| (key(k), v.map(|v| CacheValue::new(vec![v]))))
                .collect();
            let expected_writes: Vec<_> = written
                .into_iter()
                .map(|(k, v)| (key(k), v.map(|v| CacheValue::new(vec![v]))))
                .collect();

            prop_assert_eq!(reads, expected_reads);
            prop_assert_eq!(writes, expected_writes);
        }
    }
}
